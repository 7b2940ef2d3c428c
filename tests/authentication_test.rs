mod common;

use anyhow::Result;
use cashpoint::application::AppError;
use common::test_service;

#[tokio::test]
async fn test_authenticate_by_account_number() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let account = service.authenticate("1234567890", "1234").unwrap();
    assert_eq!(account.account_number, "1234567890");
    assert_eq!(account.name, "John Doe");

    Ok(())
}

#[tokio::test]
async fn test_authenticate_by_card_number() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // Either identity key must reach the same account
    let by_card = service.authenticate("CARD-0001", "1234").unwrap();
    assert_eq!(by_card.account_number, "1234567890");

    let by_number = service.authenticate("1234567890", "1234").unwrap();
    assert_eq!(by_number.account_number, by_card.account_number);

    Ok(())
}

#[tokio::test]
async fn test_authenticate_rejects_wrong_pin() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.authenticate("1234567890", "0000").unwrap_err();
    assert!(matches!(err, AppError::AuthenticationFailed));

    // A PIN belonging to a different account doesn't work either
    let err = service.authenticate("1234567890", "4321").unwrap_err();
    assert!(matches!(err, AppError::AuthenticationFailed));

    Ok(())
}

#[tokio::test]
async fn test_unknown_identifier_fails_like_wrong_pin() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let unknown = service.authenticate("9999999999", "1234").unwrap_err();
    let wrong_pin = service.authenticate("1234567890", "9999").unwrap_err();

    // The caller cannot tell which part failed
    assert!(matches!(unknown, AppError::AuthenticationFailed));
    assert!(matches!(wrong_pin, AppError::AuthenticationFailed));
    assert_eq!(unknown.to_string(), wrong_pin.to_string());

    Ok(())
}

mod common;

use anyhow::Result;
use cashpoint::application::AppError;
use common::{reload_service, test_service};

#[tokio::test]
async fn test_blank_pin_is_rejected() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    for blank in ["", "   ", "\t"] {
        let err = service.change_pin("1234567890", blank).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyPin));
    }

    // Old PIN still in force
    assert!(service.authenticate("1234567890", "1234").is_ok());

    Ok(())
}

#[tokio::test]
async fn test_change_pin_unknown_identifier() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let err = service.change_pin("0000000000", "5678").await.unwrap_err();
    assert!(matches!(err, AppError::AccountNotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_change_pin_takes_effect() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let changed = service.change_pin("1234567890", "5678").await?;
    assert_eq!(changed, "1234567890");

    // New PIN authenticates, old one no longer does
    assert!(service.authenticate("1234567890", "5678").is_ok());
    let err = service.authenticate("1234567890", "1234").unwrap_err();
    assert!(matches!(err, AppError::AuthenticationFailed));

    Ok(())
}

#[tokio::test]
async fn test_change_pin_by_card_number() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let changed = service.change_pin("CARD-0002", "9999").await?;
    assert_eq!(changed, "1111222233");

    assert!(service.authenticate("1111222233", "9999").is_ok());
    assert!(service.authenticate("CARD-0002", "9999").is_ok());

    Ok(())
}

#[tokio::test]
async fn test_new_pin_is_trimmed() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    service.change_pin("1234567890", " 5678 ").await?;
    assert!(service.authenticate("1234567890", "5678").is_ok());

    Ok(())
}

#[tokio::test]
async fn test_changed_pin_survives_reload() -> Result<()> {
    let (mut service, temp) = test_service().await?;
    service.change_pin("1234567890", "5678").await?;

    let reloaded = reload_service(&temp).await?;
    assert!(reloaded.authenticate("1234567890", "5678").is_ok());
    assert!(reloaded.authenticate("1234567890", "1234").is_err());

    Ok(())
}

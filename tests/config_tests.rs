#![cfg(feature = "core")]

use std::path::Path;

use wsfev1::core::*;

// ---------------------------------------------------------------------------
// Endpoint resolution
// ---------------------------------------------------------------------------

#[test]
fn development_and_local_use_homologation() {
    for mode in ["development", "local"] {
        let config = EndpointConfig::resolve(mode).unwrap();
        assert_eq!(config.service_endpoint(), HOMOLOGATION_ENDPOINT);
        match config.wsdl_address() {
            WsdlAddress::Local(path) => {
                assert!(path.ends_with("wsdl/wsfev1.wsdl"));
                assert!(path.is_file(), "bundled WSDL missing at {}", path.display());
            }
            other => panic!("{mode}: expected a local WSDL, got {other:?}"),
        }
    }
}

#[test]
fn production_uses_fixed_urls() {
    let config = EndpointConfig::resolve("production").unwrap();
    assert_eq!(config.service_endpoint(), PRODUCTION_ENDPOINT);
    assert_eq!(
        config.wsdl_address(),
        &WsdlAddress::Remote(PRODUCTION_WSDL.to_string())
    );
    assert!(!config.wsdl_address().is_local());
    assert_eq!(
        config.wsdl_address().to_string(),
        "https://servicios1.afip.gov.ar/wsfev1/service.asmx?WSDL"
    );
}

#[test]
fn unknown_modes_fail_fast() {
    for mode in ["", "staging", "test", "prod"] {
        assert_eq!(
            EndpointConfig::resolve(mode),
            Err(ConfigError::UnknownMode(mode.to_string()))
        );
    }
}

#[test]
fn homologation_flag() {
    assert!(DeploymentMode::Development.is_homologation());
    assert!(DeploymentMode::Local.is_homologation());
    assert!(!DeploymentMode::Production.is_homologation());
}

#[test]
fn mode_display_parses_back() {
    for mode in [
        DeploymentMode::Development,
        DeploymentMode::Local,
        DeploymentMode::Production,
    ] {
        assert_eq!(mode.to_string().parse::<DeploymentMode>(), Ok(mode));
    }
}

#[test]
fn custom_config() {
    let config = EndpointConfig::custom(
        WsdlAddress::Local(Path::new("/srv/wsdl/wsfev1.wsdl").to_path_buf()),
        "http://localhost:8080/wsfev1/service.asmx",
    );
    assert_eq!(
        config.service_endpoint(),
        "http://localhost:8080/wsfev1/service.asmx"
    );
    assert!(config.wsdl_address().is_local());
}

#[test]
fn config_loads_from_serialized_form() {
    let json = r#"{
        "wsdl_address": {"local": "/srv/wsdl/wsfev1.wsdl"},
        "service_endpoint": "https://wswhomo.afip.gov.ar/wsfev1/service.asmx"
    }"#;
    let config: EndpointConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.service_endpoint(), HOMOLOGATION_ENDPOINT);
    assert_eq!(
        config.wsdl_address(),
        &WsdlAddress::Local("/srv/wsdl/wsfev1.wsdl".into())
    );
}

#[test]
fn ticket_filename_exported() {
    assert_eq!(TICKET_FILENAME, "TA.xml");
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Single test so nothing else races on the variable.
#[test]
fn mode_from_environment() {
    // SAFETY: no other test in this binary touches MODE_ENV_VAR or WSDL_DIR_ENV_VAR.
    unsafe { std::env::remove_var(MODE_ENV_VAR) };
    assert_eq!(EndpointConfig::from_env(), Err(ConfigError::MissingMode));

    unsafe { std::env::set_var(MODE_ENV_VAR, "Production") };
    assert_eq!(DeploymentMode::from_env(), Ok(DeploymentMode::Production));
    assert_eq!(
        EndpointConfig::from_env().unwrap().service_endpoint(),
        PRODUCTION_ENDPOINT
    );

    unsafe { std::env::set_var(MODE_ENV_VAR, "development") };
    unsafe { std::env::set_var(WSDL_DIR_ENV_VAR, "/opt/wsfe") };
    assert_eq!(
        EndpointConfig::from_env().unwrap().wsdl_address(),
        &WsdlAddress::Local("/opt/wsfe/wsfev1.wsdl".into())
    );
    unsafe { std::env::set_var(WSDL_DIR_ENV_VAR, "") };
    assert_eq!(
        EndpointConfig::from_env().unwrap().wsdl_address(),
        &WsdlAddress::Local(BUNDLED_WSDL.into())
    );
    unsafe { std::env::remove_var(WSDL_DIR_ENV_VAR) };

    unsafe { std::env::set_var(MODE_ENV_VAR, "qa") };
    assert_eq!(
        DeploymentMode::from_env(),
        Err(ConfigError::UnknownMode("qa".into()))
    );

    unsafe { std::env::remove_var(MODE_ENV_VAR) };
}

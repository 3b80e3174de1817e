use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Environment variable holding the deployment mode.
pub const MODE_ENV_VAR: &str = "WSFE_ENV";

/// Homologation (test) service endpoint.
pub const HOMOLOGATION_ENDPOINT: &str = "https://wswhomo.afip.gov.ar/wsfev1/service.asmx";

/// Production service endpoint.
pub const PRODUCTION_ENDPOINT: &str = "https://servicios1.afip.gov.ar/wsfev1/service.asmx";

/// Production WSDL, served by AFIP.
pub const PRODUCTION_WSDL: &str = "https://servicios1.afip.gov.ar/wsfev1/service.asmx?WSDL";

/// Environment variable overriding the directory of the homologation WSDL.
pub const WSDL_DIR_ENV_VAR: &str = "WSFE_WSDL_DIR";

/// File name of the homologation WSDL inside its directory.
pub const WSDL_FILENAME: &str = "wsfev1.wsdl";

/// WSDL definition shipped with the crate, used against homologation.
///
/// This is an absolute path on the build machine. Binaries deployed away
/// from the source tree must ship the file and point at it with
/// [`EndpointConfig::with_wsdl_dir`] or [`WSDL_DIR_ENV_VAR`].
pub const BUNDLED_WSDL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/wsdl/wsfev1.wsdl");

/// File name of the WSAA access ticket. Ticket acquisition is not
/// supported by this crate; the name is exported for callers that manage
/// tickets themselves.
pub const TICKET_FILENAME: &str = "TA.xml";

/// Where the application is deployed. Selects the AFIP server pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    Development,
    Local,
    Production,
}

impl DeploymentMode {
    /// Read the mode from [`MODE_ENV_VAR`].
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingMode` if the variable is unset or not unicode,
    /// `ConfigError::UnknownMode` if it holds anything else than the three
    /// known modes.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var(MODE_ENV_VAR).map_err(|_| ConfigError::MissingMode)?;
        raw.parse()
    }

    /// Whether this mode talks to the homologation servers.
    pub fn is_homologation(&self) -> bool {
        matches!(self, Self::Development | Self::Local)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Local => "local",
            Self::Production => "production",
        }
    }
}

impl FromStr for DeploymentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of the WSDL definition handed to the SOAP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WsdlAddress {
    /// A file on the local filesystem.
    Local(PathBuf),
    /// A URL served by the remote host.
    Remote(String),
}

impl WsdlAddress {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl fmt::Display for WsdlAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

/// WSDL location and service endpoint of the WSFEv1 service.
///
/// Resolved once, then handed to the gateway. Never mutated afterwards.
///
/// ```
/// use wsfev1::core::*;
///
/// let config = EndpointConfig::for_mode(DeploymentMode::Production);
/// assert_eq!(config.service_endpoint(), PRODUCTION_ENDPOINT);
///
/// assert!(EndpointConfig::resolve("staging").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    wsdl_address: WsdlAddress,
    service_endpoint: String,
}

impl EndpointConfig {
    /// Fixed server pair of a deployment mode.
    pub fn for_mode(mode: DeploymentMode) -> Self {
        if mode.is_homologation() {
            Self {
                wsdl_address: WsdlAddress::Local(PathBuf::from(BUNDLED_WSDL)),
                service_endpoint: HOMOLOGATION_ENDPOINT.to_string(),
            }
        } else {
            Self {
                wsdl_address: WsdlAddress::Remote(PRODUCTION_WSDL.to_string()),
                service_endpoint: PRODUCTION_ENDPOINT.to_string(),
            }
        }
    }

    /// Parse `mode` and resolve its server pair. Unknown modes fail.
    pub fn resolve(mode: &str) -> Result<Self, ConfigError> {
        mode.parse().map(Self::for_mode)
    }

    /// Like [`for_mode`](Self::for_mode), but homologation modes read
    /// [`WSDL_FILENAME`] from `dir` instead of the bundled copy. Production
    /// always uses the remote WSDL.
    pub fn with_wsdl_dir(mode: DeploymentMode, dir: impl AsRef<Path>) -> Self {
        let mut config = Self::for_mode(mode);
        if mode.is_homologation() {
            config.wsdl_address = WsdlAddress::Local(dir.as_ref().join(WSDL_FILENAME));
        }
        config
    }

    /// Resolve from the [`MODE_ENV_VAR`] environment variable. A non-empty
    /// [`WSDL_DIR_ENV_VAR`] relocates the homologation WSDL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode = DeploymentMode::from_env()?;
        Ok(match std::env::var_os(WSDL_DIR_ENV_VAR) {
            Some(dir) if !dir.is_empty() => Self::with_wsdl_dir(mode, dir),
            _ => Self::for_mode(mode),
        })
    }

    /// Arbitrary server pair, e.g. a local mock server.
    pub fn custom(wsdl_address: WsdlAddress, service_endpoint: impl Into<String>) -> Self {
        Self {
            wsdl_address,
            service_endpoint: service_endpoint.into(),
        }
    }

    pub fn wsdl_address(&self) -> &WsdlAddress {
        &self.wsdl_address
    }

    pub fn service_endpoint(&self) -> &str {
        &self.service_endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing_is_case_insensitive() {
        assert_eq!("Production".parse::<DeploymentMode>(), Ok(DeploymentMode::Production));
        assert_eq!(" local ".parse::<DeploymentMode>(), Ok(DeploymentMode::Local));
        assert_eq!("DEVELOPMENT".parse::<DeploymentMode>(), Ok(DeploymentMode::Development));
    }

    #[test]
    fn unknown_mode_keeps_raw_value() {
        let err = "test".parse::<DeploymentMode>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownMode("test".into()));
    }

    #[test]
    fn bundled_wsdl_points_into_crate() {
        assert!(BUNDLED_WSDL.ends_with("wsdl/wsfev1.wsdl"));
        assert!(std::path::Path::new(BUNDLED_WSDL).is_file());
    }

    #[test]
    fn wsdl_dir_relocates_homologation_only() {
        let config = EndpointConfig::with_wsdl_dir(DeploymentMode::Local, "/srv/app/wsdl");
        assert_eq!(
            config.wsdl_address(),
            &WsdlAddress::Local(PathBuf::from("/srv/app/wsdl/wsfev1.wsdl"))
        );
        assert_eq!(config.service_endpoint(), HOMOLOGATION_ENDPOINT);

        let config = EndpointConfig::with_wsdl_dir(DeploymentMode::Production, "/srv/app/wsdl");
        assert_eq!(config, EndpointConfig::for_mode(DeploymentMode::Production));
    }

    #[test]
    fn config_serde_shape() {
        let config = EndpointConfig::for_mode(DeploymentMode::Production);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["wsdl_address"]["remote"], PRODUCTION_WSDL);
        assert_eq!(json["service_endpoint"], PRODUCTION_ENDPOINT);
        let back: EndpointConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}

//! Binary persistence of [`RoboBaseConfig`]
//!
//! Layout: 4-byte little-endian magic, 1-byte version, postcard body.

use super::hardware::{ConfigError, RoboBaseConfig};

/// Magic number to identify stored configuration ("RBSE")
pub const CONFIG_MAGIC: u32 = 0x4553_4252;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

const HEADER_LEN: usize = 5;

impl RoboBaseConfig {
    /// Serialize into `buf`, returning the used prefix
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        if buf.len() < HEADER_LEN {
            return Err(ConfigError::Encode);
        }

        let (header, body) = buf.split_at_mut(HEADER_LEN);
        header[..4].copy_from_slice(&CONFIG_MAGIC.to_le_bytes());
        header[4] = CONFIG_VERSION;
        let body_len = postcard::to_slice(self, body)
            .map_err(|_| ConfigError::Encode)?
            .len();

        Ok(&mut buf[..HEADER_LEN + body_len])
    }

    /// Deserialize and validate a stored configuration
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() < HEADER_LEN {
            return Err(ConfigError::Decode);
        }

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        if u32::from_le_bytes(magic) != CONFIG_MAGIC {
            return Err(ConfigError::BadMagic);
        }
        if bytes[4] != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(bytes[4]));
        }

        let config: RoboBaseConfig =
            postcard::from_bytes(&bytes[HEADER_LEN..]).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }
}

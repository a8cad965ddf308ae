use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    let decoded = serde_path_to_error::deserialize::<_, T>(&mut *de);
    finish(de, decoded)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    let decoded = serde_path_to_error::deserialize::<_, T>(&mut *de);
    finish(de, decoded)
}

fn finish<'de, R, T>(
    de: &mut serde_json::Deserializer<R>,
    decoded: std::result::Result<T, serde_path_to_error::Error<serde_json::Error>>,
) -> Result<T>
where
    R: serde_json::de::Read<'de>,
{
    let value = decoded.map_err(|err| Error::Decode {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })?;
    // trailing garbage after the document is a decode failure too
    de.end().map_err(|err| Error::Decode {
        path: ".".to_string(),
        message: err.to_string(),
    })?;
    Ok(value)
}

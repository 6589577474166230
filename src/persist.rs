//! Saving and loading anything serde knows about as JSON, to strings and files.
//!
//! Genomes are the usual customer: their networks are always re-derivable, so only the genes,
//! the bias map and the io shape are ever written.

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::Path};

pub trait Persist: Sized {
    fn to_json(&self) -> Result<String>;

    fn from_json(s: &str) -> Result<Self>;

    fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

impl<T: Serialize + DeserializeOwned> Persist for T {
    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

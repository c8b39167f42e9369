use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::trigger::{ApiSurface, TypedId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_key: String,
    #[serde(default)]
    pub site: Site,
    /// overrides the site's URL, e.g. for a private deployment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl AppSettings {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.site.base_url())
    }
}

/// hosted regions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Site {
    #[default]
    Us,
    Jp,
    Cn3,
    Sg,
    Eu,
}

impl Site {
    pub fn base_url(&self) -> &'static str {
        match self {
            Site::Us => "https://api.kii.com",
            Site::Jp => "https://api-jp.kii.com",
            Site::Cn3 => "https://api-cn3.kii.com",
            Site::Sg => "https://api-sg.kii.com",
            Site::Eu => "https://api-eu.kii.com",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Site::Us => "US",
            Site::Jp => "JP",
            Site::Cn3 => "CN3",
            Site::Sg => "SG",
            Site::Eu => "EU",
        }
    }
}

impl FromStr for Site {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "US" => Ok(Site::Us),
            "JP" => Ok(Site::Jp),
            "CN3" => Ok(Site::Cn3),
            "SG" => Ok(Site::Sg),
            "EU" => Ok(Site::Eu),
            _ => Err(format!(
                "invalid site '{}': use US, JP, CN3, SG or EU",
                s
            )),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// owner and target used when a command doesn't name them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<TypedId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TypedId>,
    #[serde(default)]
    pub api_surface: ApiSurface,
}

use std::{collections::HashMap, fmt, path::PathBuf};

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::Error;

#[derive(Clone)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub expires_in: u64,
    pub user_id: String,
    pub obtained_at: DateTime<Local>,
}

impl AuthSession {
    pub fn expires_at(&self) -> DateTime<Local> {
        self.obtained_at + Duration::seconds(self.expires_in as i64)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormContext {
    pub submit_url: Option<String>,
    pub hidden_fields: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioItem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub owner_id: Option<i64>,
    pub artist: String,
    pub title: String,
    #[serde(default)]
    pub duration: Option<u64>,
    pub url: String,
}

impl AudioItem {
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioList {
    #[serde(default)]
    pub count: u64,
    pub items: Vec<AudioItem>,
}

#[derive(Debug, Clone, Default)]
pub struct AudioQuery {
    pub owner_id: Option<String>,
    pub count: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Tabled)]
pub struct AudioTableRow {
    pub artist: String,
    pub title: String,
    pub duration: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    Sequential,
    Batched(usize),
}

#[derive(Debug)]
pub enum DownloadOutcome {
    Downloaded { path: PathBuf, bytes: u64 },
    AlreadyExists(PathBuf),
    Duplicate(PathBuf),
    Failed(Error),
}

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub entries: Vec<(AudioItem, DownloadOutcome)>,
}

impl DownloadReport {
    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Downloaded { .. }))
    }

    pub fn already_present(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::AlreadyExists(_)))
    }

    pub fn duplicates(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Duplicate(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Failed(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&AudioItem, &Error)> {
        self.entries.iter().filter_map(|(item, outcome)| match outcome {
            DownloadOutcome::Failed(e) => Some((item, e)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&DownloadOutcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| pred(o)).count()
    }
}

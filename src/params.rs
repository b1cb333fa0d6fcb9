use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use reqwest::Url;

pub const DEFAULT_LOCATION: &str = "http://localhost:3000/sel";

/// Query-string parameter store. Stands in for the browser location so the
/// table never touches ambient navigation state.
pub trait ParamStore: Send {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: &str);
    fn remove(&mut self, name: &str);
    /// Receives the full location after every change.
    fn subscribe(&mut self) -> Receiver<String>;
    fn location(&self) -> String;
}

#[derive(Debug)]
pub struct QueryParams {
    url: Url,
    subscribers: Vec<Sender<String>>,
}

impl QueryParams {
    /// Accepts an absolute location or a bare query (`?season=2023`), which
    /// is resolved against the default page.
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        let url = if location.is_empty() {
            Url::parse(DEFAULT_LOCATION)
        } else if location.starts_with('?') {
            Url::parse(DEFAULT_LOCATION).and_then(|base| base.join(location))
        } else {
            Url::parse(location)
        }
        .with_context(|| format!("invalid location {location:?}"))?;
        Ok(Self {
            url,
            subscribers: Vec::new(),
        })
    }

    fn pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn write_pairs(&mut self, pairs: &[(String, String)]) {
        if pairs.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.query_pairs_mut().clear().extend_pairs(pairs);
        }
        let location = self.url.to_string();
        self.subscribers
            .retain(|tx| tx.send(location.clone()).is_ok());
    }
}

impl ParamStore for QueryParams {
    fn get(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// Replaces the first occurrence in place and drops any repeats.
    fn set(&mut self, name: &str, value: &str) {
        let mut pairs = self.pairs();
        let mut replaced = false;
        pairs.retain_mut(|(k, v)| {
            if k.as_str() != name {
                return true;
            }
            if replaced {
                return false;
            }
            *v = value.to_string();
            replaced = true;
            true
        });
        if !replaced {
            pairs.push((name.to_string(), value.to_string()));
        }
        self.write_pairs(&pairs);
    }

    fn remove(&mut self, name: &str) {
        let mut pairs = self.pairs();
        let before = pairs.len();
        pairs.retain(|(k, _)| k != name);
        if pairs.len() != before {
            self.write_pairs(&pairs);
        }
    }

    fn subscribe(&mut self) -> Receiver<String> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn location(&self) -> String {
        self.url.to_string()
    }
}

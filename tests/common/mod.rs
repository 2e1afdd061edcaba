//! Common test utilities

#![allow(dead_code)]

use path_scan::function::prober::ScanOptions;
use path_scan::function::report::Finding;
use path_scan::function::scanner::ScanObserver;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub fn test_options(concurrency: usize) -> ScanOptions {
    ScanOptions {
        concurrency,
        timeout: Duration::from_secs(5),
        user_agent: "PathScan-Test/0.1.0".to_string(),
        ..ScanOptions::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CategoryStart(String, usize),
    Progress(usize, usize),
    Finding(String),
    Miss(String),
    CategoryEnd(String),
}

/// Records every callback, optionally raising the cancel flag on the first finding
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<Event>>,
    pub cancel_on_finding: Option<Arc<AtomicBool>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<(usize, usize)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Progress(done, total) => Some((done, total)),
                _ => None,
            })
            .collect()
    }

    pub fn misses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Miss(url) => Some(url),
                _ => None,
            })
            .collect()
    }
}

impl ScanObserver for RecordingObserver {
    fn on_category_start(&self, name: &str, total: usize) {
        self.events.lock().unwrap().push(Event::CategoryStart(name.to_string(), total));
    }

    fn on_progress(&self, completed: usize, total: usize) {
        self.events.lock().unwrap().push(Event::Progress(completed, total));
    }

    fn on_finding(&self, finding: &Finding) {
        self.events.lock().unwrap().push(Event::Finding(finding.path.clone()));
        if let Some(flag) = &self.cancel_on_finding {
            flag.store(true, Ordering::SeqCst);
        }
    }

    fn on_miss(&self, url: &str) {
        self.events.lock().unwrap().push(Event::Miss(url.to_string()));
    }

    fn on_category_end(&self, name: &str) {
        self.events.lock().unwrap().push(Event::CategoryEnd(name.to_string()));
    }
}

pub fn paths(findings: &[Finding]) -> Vec<&str> {
    findings.iter().map(|f| f.path.as_str()).collect()
}

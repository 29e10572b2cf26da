use std::env;
use std::fmt;
use std::path::Path;

use crate::config::{
    ENDPOINT_ENV, EndpointSource, PlacementConfig, load_config, parse_endpoint,
    resolve_config_path, select_endpoint,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

pub fn run_doctor(endpoint_flag: Option<&str>) -> DoctorReport {
    let environment = env::var(ENDPOINT_ENV).ok();
    let config_path = resolve_config_path().ok();
    run_doctor_at(
        config_path.as_deref(),
        endpoint_flag,
        environment.as_deref(),
    )
}

pub fn run_doctor_at(
    config_path: Option<&Path>,
    endpoint_flag: Option<&str>,
    environment: Option<&str>,
) -> DoctorReport {
    let mut checks = Vec::new();
    let mut config: Option<PlacementConfig> = None;
    let mut config_usable = true;

    match config_path {
        Some(path) => {
            checks.push(pass_check(
                "config path resolves",
                path.display().to_string(),
            ));

            if path.exists() {
                checks.push(pass_check(
                    "config file exists",
                    format!("found at {}", path.display()),
                ));
                match load_config(path) {
                    Ok(loaded) => {
                        checks.push(pass_check("config parses and validates", "config is valid"));
                        config = Some(loaded);
                    }
                    Err(error) => {
                        checks.push(fail_check("config parses and validates", error.to_string()));
                        config_usable = false;
                    }
                }
            } else {
                checks.push(pass_check(
                    "config file exists",
                    format!(
                        "not present at {}, built-in defaults apply",
                        path.display()
                    ),
                ));
                checks.push(pass_check(
                    "config parses and validates",
                    "nothing to parse",
                ));
            }
        }
        None => {
            checks.push(fail_check(
                "config path resolves",
                "could not resolve home directory",
            ));
            push_skipped_checks(
                &mut checks,
                &["config file exists", "config parses and validates"],
                "config path could not be resolved",
            );
        }
    }

    checks.push(check_endpoint(
        endpoint_flag,
        environment,
        config.as_ref(),
        config_usable,
    ));

    DoctorReport { checks }
}

fn check_endpoint(
    flag: Option<&str>,
    environment: Option<&str>,
    config: Option<&PlacementConfig>,
    config_usable: bool,
) -> DoctorCheck {
    let (endpoint, source) = select_endpoint(flag, environment, config);
    if !config_usable && source == EndpointSource::BuiltIn {
        return skipped_check("endpoint is a valid http(s) URL", "config is invalid");
    }

    match parse_endpoint(&endpoint) {
        Ok(url) => pass_check(
            "endpoint is a valid http(s) URL",
            format!("{url} (from {})", source.describe()),
        ),
        Err(error) => fail_check(
            "endpoint is a valid http(s) URL",
            format!("{error} (from {})", source.describe()),
        ),
    }
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}

fn skipped_check(name: &str, reason: &str) -> DoctorCheck {
    fail_check(name, format!("skipped because {reason}"))
}

fn push_skipped_checks(checks: &mut Vec<DoctorCheck>, names: &[&str], reason: &str) {
    checks.extend(
        names
            .iter()
            .copied()
            .map(|name| skipped_check(name, reason)),
    );
}

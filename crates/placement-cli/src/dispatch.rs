use anyhow::Result;
use comfy_table::{Cell, ContentArrangement, Table};
use placement_app::App;
use placement_core::doctor::DoctorReport;
use placement_tui::UiExit;

use crate::cli::{Cli, Command};

pub fn run_with_deps(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Doctor) => run_doctor_command(cli.endpoint.as_deref()),
        None => run_root_command(cli.endpoint.as_deref()),
    }
}

fn run_root_command(endpoint_flag: Option<&str>) -> Result<()> {
    let app = App::from_environment(endpoint_flag)?;

    match placement_tui::run_form(&app)? {
        UiExit::Completed => tracing::debug!("form completed"),
        UiExit::Canceled => tracing::debug!("form canceled"),
    }

    Ok(())
}

fn run_doctor_command(endpoint_flag: Option<&str>) -> Result<()> {
    let report = App::doctor(endpoint_flag);
    print_doctor_report(&report);
    Ok(())
}

fn print_doctor_report(report: &DoctorReport) {
    println!("{}", doctor_table(report));
    println!("{}", report.summary());
}

fn doctor_table(report: &DoctorReport) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        table.add_row(vec![
            Cell::new(check.name.as_str()),
            Cell::new(check.state.to_string()),
            Cell::new(check.details.as_str()),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use placement_core::doctor::{CheckState, DoctorCheck, DoctorReport};

    use super::doctor_table;

    #[test]
    fn doctor_table_lists_every_check_with_status() {
        let report = DoctorReport {
            checks: vec![
                DoctorCheck {
                    name: "config file exists".to_string(),
                    state: CheckState::Pass,
                    details: "found".to_string(),
                },
                DoctorCheck {
                    name: "endpoint is a valid http(s) URL".to_string(),
                    state: CheckState::Fail,
                    details: "unsupported scheme".to_string(),
                },
            ],
        };

        let rendered = doctor_table(&report).to_string();
        assert!(rendered.contains("config file exists"));
        assert!(rendered.contains("PASS"));
        assert!(rendered.contains("FAIL"));
        assert!(rendered.contains("unsupported scheme"));
    }
}

//! Runtime configuration of terminal error reports.

use eyre::Result;

/// `details` is a comma-separated list of report sections to show:
/// `location`, `span`, `env`. `"all"` shows all of them, `"none"` shows
/// none, `"auto"` shows all in debug builds and none in release builds.
pub fn setup(details: &str, link: bool) -> Result<()> {
    let all = ["location", "span", "env"];
    let details: Vec<&str> = match details {
        "auto" => {
            if cfg!(debug_assertions) {
                all.to_vec()
            } else {
                vec![]
            }
        }
        "all" => all.to_vec(),
        "none" => vec![],
        other => other.split(',').collect(),
    };

    let mut builder = color_eyre::config::HookBuilder::default()
        .display_location_section(details.contains(&"location"))
        .display_env_section(details.contains(&"env"));

    if !details.contains(&"span") && !link {
        std::env::set_var("RUST_SPANTRACE", "0");
    }

    if link {
        builder = builder
            .issue_url(concat!(env!("CARGO_PKG_REPOSITORY"), "/issues/new"))
            .add_issue_metadata("version", env!("CARGO_PKG_VERSION"))
            .add_issue_metadata("os", std::env::consts::OS);
    }

    builder.install()?;
    Ok(())
}

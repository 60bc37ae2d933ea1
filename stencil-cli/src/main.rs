//! Stencil CLI
//!
//! Renders a template file with plugin namespaces loaded from a JSON config.
//! Rendered output goes to stdout, logs to stderr.

mod config;

use clap::Parser;
use config::Config;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stencil::Value;
use stencil_core::{Result, StencilError};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Template file to render
    #[arg(required_unless_present = "list")]
    template: Option<PathBuf>,

    /// JSON object with template variables
    #[arg(long)]
    vars: Option<PathBuf>,

    /// Plugin configuration
    #[arg(long, env = "STENCIL_CONFIG")]
    config: Option<PathBuf>,

    /// Print available filters and tags as JSON instead of rendering
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(code = %err.code, "{}", err);
            if let Some(suggestion) = &err.suggestion {
                eprintln!("{}", suggestion);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => {
            debug!("no config given, rendering without plugins");
            Config::default()
        }
    };
    let (stencil, enabled) = config.build()?;

    if args.list {
        return Ok(format!("{:#}\n", stencil.describe()));
    }

    let path = args.template.as_deref()
        .ok_or_else(|| StencilError::config_error("no template given"))?;
    let source = read(path)?;
    let template = stencil.parse(&source)?;

    let variables = match &args.vars {
        Some(path) => load_vars(path)?,
        None => BTreeMap::new(),
    };

    let mut ctx = stencil.context().with_variables(variables);
    ctx.registers_mut().insert(enabled);
    template.render(&mut ctx)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| StencilError::config_error(format!("cannot read '{}': {}", path.display(), e)))
}

fn load_vars(path: &Path) -> Result<BTreeMap<String, Value>> {
    parse_vars(&read(path)?)
}

fn parse_vars(text: &str) -> Result<BTreeMap<String, Value>> {
    let json: BTreeMap<String, serde_json::Value> = serde_json::from_str(text)?;
    Ok(json.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use stencil_core::codes;

    #[test]
    fn test_args() {
        Args::command().debug_assert();

        let args = Args::try_parse_from(["stencil", "page.html", "--vars", "v.json"]).unwrap();
        assert_eq!(args.template, Some(PathBuf::from("page.html")));
        assert_eq!(args.vars, Some(PathBuf::from("v.json")));
        assert!(!args.list);

        assert!(Args::try_parse_from(["stencil", "--list"]).is_ok());
    }

    #[test]
    fn test_parse_vars() {
        let vars = parse_vars(r#"{"name": "ada", "tags": ["a", "b"], "count": 3}"#).unwrap();
        assert_eq!(vars["name"], Value::from("ada"));
        assert_eq!(vars["count"], Value::Int(3));
        assert_eq!(vars["tags"].to_string(), "ab");

        assert_eq!(parse_vars("[1, 2]").unwrap_err().code, codes::CONFIG_ERROR);
    }

    #[test]
    fn test_render_with_enabled_plugins() {
        let config = Config::parse(
            r#"{"plugins":[{"id":"markup","prefix":"mk"},{"id":"url","prefix":"u"}]}"#,
        )
        .unwrap();
        let (stencil, enabled) = config.build().unwrap();

        let template = stencil
            .parse("{% mk_paragraph %}{{ site | u_add_http }}{% endmk_paragraph %}")
            .unwrap();
        let mut ctx = stencil.context().with_variable("site", "example.org");
        ctx.registers_mut().insert(enabled);
        assert_eq!(template.render(&mut ctx).unwrap(), "<p>http://example.org</p>");
    }

    #[test]
    fn test_missing_template_file() {
        let args = Args {
            template: Some(PathBuf::from("/definitely/not/here.html")),
            vars: None,
            config: None,
            list: false,
        };
        assert_eq!(run(&args).unwrap_err().code, codes::CONFIG_ERROR);
    }
}

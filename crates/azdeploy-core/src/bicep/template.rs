use anyhow::Context;
use handlebars::Handlebars;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::{fs, io};

use crate::{ConfigError, DeploymentConfig};

const PARAMETERS_ANCHOR: &str = "param location";
const LOCATION_PARAMETER: &str = "param location string = resourceGroup().location";
const PG_SERVER_ANCHOR: &str = "resource pgServer";

const PARAMETERS_BLOCK: &str = include_str!("../../templates/parameters.bicep");
const PG_SERVER_TEMPLATE: &str = include_str!("../../templates/pg_server.bicep.hbs");

lazy_static! {
    // lazy match up to the first `}}`, not aware of bicep syntax
    static ref PG_SERVER_PATTERN: Regex =
        Regex::new(r"(?s)resource pgServer.*?\}\}").expect("pgServer pattern is valid");
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatchedTemplate {
    pub contents: String,
    pub parameters_replaced: bool,
    pub pg_server_replaced: bool,
}

pub fn render_pg_server(config: &DeploymentConfig) -> anyhow::Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.register_template_string("pg_server", PG_SERVER_TEMPLATE)?;

    let mut values: HashMap<&str, String> = HashMap::new();
    values.insert("version", config.required_services.postgresql.version_label());

    Ok(handlebars.render("pg_server", &values)?)
}

/// Rewrites the location parameter into the full parameter block and swaps the
/// first `pgServer` resource for a freshly rendered one.
///
/// A section whose anchor text is missing is left as it is.
pub fn patch_template(template: &str, config: &DeploymentConfig) -> anyhow::Result<PatchedTemplate> {
    let mut contents = template.to_string();

    let mut parameters_replaced = false;
    if contents.contains(PARAMETERS_ANCHOR) {
        let replaced = contents.replace(LOCATION_PARAMETER, PARAMETERS_BLOCK.trim());
        parameters_replaced = replaced != contents;
        contents = replaced;
    }

    if !parameters_replaced {
        tracing::warn!("'{LOCATION_PARAMETER}' not found in template, parameters left unchanged");
    }

    let mut pg_server_replaced = false;
    if contents.contains(PG_SERVER_ANCHOR) {
        let pg_server = render_pg_server(config)?;

        let matched_range = PG_SERVER_PATTERN.find(&contents).map(|found| found.range());

        if let Some(range) = matched_range {
            contents.replace_range(range, pg_server.trim());
            pg_server_replaced = true;
        }
    }

    if !pg_server_replaced {
        tracing::warn!("'{PG_SERVER_ANCHOR}' block not found in template, left unchanged");
    }

    Ok(PatchedTemplate {
        contents,
        parameters_replaced,
        pg_server_replaced,
    })
}

#[tracing::instrument(name = "bicep::update_template", skip(config))]
pub fn update_template(path: &Path, config: &DeploymentConfig) -> anyhow::Result<PatchedTemplate> {
    let template = match fs::read_to_string(path) {
        Ok(template) => template,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into())
        }
        Err(error) => {
            return Err(error).with_context(|| format!("failed to read {}", path.display()))
        }
    };

    let patched = patch_template(&template, config)?;

    fs::write(path, &patched.contents)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(
        parameters_replaced = patched.parameters_replaced,
        pg_server_replaced = patched.pg_server_replaced,
        "updated template {}",
        path.display()
    );

    Ok(patched)
}

//! Scenario catalog, snippet generation and special-product fixtures.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use url::Url;

use testmart_core::{ProductId, ScenarioKind};
use testmart_storefront::fixtures::{self, Popup, Selector};
use testmart_storefront::scenarios::{self, Area, Framework, Scenario};
use testmart_storefront::{AppError, Result, catalog};

use super::product;
use crate::error::CliError;
use crate::output::{Output, Render, table};

#[derive(Debug, Subcommand)]
pub enum ScenarioAction {
    /// List scenarios
    List {
        /// authentication, products, special-products, cart or checkout
        #[arg(short, long)]
        area: Option<Area>,
        /// positive, negative or edge
        #[arg(short, long)]
        kind: Option<ScenarioKind>,
    },
    /// Show one scenario
    Show { id: String },
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ScenarioList(pub Vec<Scenario>);

pub fn list(area: Option<Area>, kind: Option<ScenarioKind>) -> ScenarioList {
    ScenarioList(scenarios::filter(area, kind).into_iter().cloned().collect())
}

impl Render for ScenarioList {
    fn render(&self) -> String {
        let mut t = table(["ID", "Area", "Kind", "Title", "Script"]);
        for s in &self.0 {
            t.add_row([
                s.id.clone(),
                s.area.to_string(),
                s.kind.to_string(),
                s.title.clone(),
                if s.has_script() { "yes" } else { "no" }.to_string(),
            ]);
        }
        t.to_string()
    }
}

pub fn show(id: &str) -> Result<Scenario> {
    scenarios::find(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("scenario {id}")))
}

impl Render for Scenario {
    fn render(&self) -> String {
        let steps = self
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("  {}. {step}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "{} - {} ({}, {})\nSteps:\n{steps}\nExpected: {}\nTest data: {}",
            self.id, self.title, self.area, self.kind, self.expected, self.test_data
        )
    }
}

/// Selection and target for `snippet`.
#[derive(Debug, Args)]
pub struct SnippetArgs {
    /// Scenario ids; every scripted scenario matching the filters when empty
    pub ids: Vec<String>,

    #[arg(short, long, default_value = "selenium")]
    pub framework: Framework,

    #[arg(short, long)]
    pub area: Option<Area>,

    #[arg(short, long)]
    pub kind: Option<ScenarioKind>,

    /// Storefront URL the script navigates to; defaults to the configured one
    #[arg(long)]
    pub base_url: Option<Url>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SnippetArgs {
    /// Scenarios to render. Explicit ids must all exist; filters skip
    /// scenarios without a script.
    fn selection(&self) -> Result<Vec<&'static Scenario>> {
        if self.ids.is_empty() {
            return Ok(scenarios::filter(self.area, self.kind)
                .into_iter()
                .filter(|s| s.has_script())
                .collect());
        }
        self.ids
            .iter()
            .map(|id| {
                scenarios::find(id).ok_or_else(|| AppError::NotFound(format!("scenario {id}")))
            })
            .collect()
    }
}

/// Render the selected scenarios.
pub fn snippet(args: &SnippetArgs, default_base: &Url) -> Result<String> {
    let selected = args.selection()?;
    let base = args.base_url.as_ref().unwrap_or(default_base);
    Ok(scenarios::render(args.framework, &selected, base)?)
}

/// Render and write the snippet to `--output` or stdout.
pub fn write_snippet(
    args: &SnippetArgs,
    default_base: &Url,
    out: &Output,
) -> std::result::Result<(), CliError> {
    let source = snippet(args, default_base)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &source).map_err(|source| CliError::File {
                path: path.display().to_string(),
                source,
            })?;
            out.notify(
                "Snippet Written",
                format!("{} source written to {}.", args.framework, path.display()),
            )?;
        }
        None => out.line(source),
    }
    Ok(())
}

/// Automation targets of special products.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureTargets {
    pub product_id: ProductId,
    pub name: String,
    pub special_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_text: Option<&'static str>,
    pub selectors: Vec<Selector>,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Fixtures(pub Vec<FixtureTargets>);

/// Targets for one special product, or for all of them.
pub fn fixtures(id: Option<ProductId>) -> Result<Fixtures> {
    let products = match id {
        Some(id) => vec![product(id)?],
        None => catalog::products().iter().collect(),
    };
    Ok(Fixtures(
        products
            .into_iter()
            .filter_map(|p| {
                let kind = p.special_type?;
                Some(FixtureTargets {
                    product_id: p.id,
                    name: p.name.clone(),
                    special_type: kind.to_string(),
                    alert_text: fixtures::alert_text(kind),
                    selectors: fixtures::selectors(p),
                })
            })
            .collect(),
    ))
}

impl Render for Fixtures {
    fn render(&self) -> String {
        if self.0.is_empty() {
            return "Not a special product.".to_string();
        }
        let mut t = table(["Product", "Type", "Role", "Selector"]);
        for f in &self.0 {
            for s in &f.selectors {
                t.add_row([
                    format!("{} {}", f.product_id, f.name),
                    f.special_type.clone(),
                    s.role.to_string(),
                    s.css(),
                ]);
            }
        }
        t.to_string()
    }
}

impl Render for Popup {
    fn render(&self) -> String {
        format!("[{}] {}", self.sequence, self.message)
    }
}

/// Run the timed popup schedule, printing each popup as it fires.
pub async fn popups(out: &Output) -> std::result::Result<(), CliError> {
    let mut failure = None;
    fixtures::run_timed_popups(|popup| {
        if failure.is_none() {
            failure = out.emit(&popup).err();
        }
    })
    .await;
    failure.map_or(Ok(()), |err| Err(err.into()))
}

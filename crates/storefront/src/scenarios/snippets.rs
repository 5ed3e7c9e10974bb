//! Selenium and Playwright source generators for scenario scripts.
//!
//! Selenium output is a pytest module driving Chrome; Playwright output is an
//! `@playwright/test` spec. Both target elements by CSS so the same
//! [`Target`] renders identically in either framework.

use thiserror::Error;
use url::Url;

use super::{Scenario, Step, Target};

/// Errors that can occur when rendering snippets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnippetError {
    /// The scenario has no structured script.
    #[error("scenario {0} has no automation script")]
    NoScript(String),

    /// Nothing to render.
    #[error("no scenarios to render")]
    Empty,
}

/// Automation framework to render for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framework {
    /// Python, pytest style.
    #[default]
    Selenium,
    /// TypeScript, `@playwright/test`.
    Playwright,
}

impl Framework {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Selenium => "selenium",
            Self::Playwright => "playwright",
        }
    }

    /// Conventional file extension for the generated source.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Selenium => "py",
            Self::Playwright => "spec.ts",
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "selenium" => Ok(Self::Selenium),
            "playwright" => Ok(Self::Playwright),
            _ => Err(format!("invalid framework: {s}")),
        }
    }
}

/// Render `scenarios` as one source file against `base_url`.
///
/// # Errors
///
/// Returns `SnippetError::Empty` for an empty list and
/// `SnippetError::NoScript` for the first scenario without a script.
pub fn render(
    framework: Framework,
    scenarios: &[&Scenario],
    base_url: &Url,
) -> Result<String, SnippetError> {
    if scenarios.is_empty() {
        return Err(SnippetError::Empty);
    }
    if let Some(unscripted) = scenarios.iter().find(|s| !s.has_script()) {
        return Err(SnippetError::NoScript(unscripted.id.clone()));
    }

    let base = base_url.as_str().trim_end_matches('/');
    Ok(match framework {
        Framework::Selenium => selenium::render(scenarios, base),
        Framework::Playwright => playwright::render(scenarios, base),
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Escape `s` for a single-quoted string literal in either target language.
fn single_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// `AUTH_001` + `Valid Admin Login` becomes `auth_001_valid_admin_login`.
fn test_name(scenario: &Scenario) -> String {
    let mut name = scenario.id.to_lowercase();
    let mut pending_sep = true;
    for c in scenario.title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep {
                name.push('_');
                pending_sep = false;
            }
            name.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    name
}

mod selenium {
    use std::fmt::Write as _;

    use super::{Scenario, Step, Target, single_quoted, test_name};

    const HEADER: &str = "\
import pytest
from selenium import webdriver
from selenium.webdriver.common.by import By
from selenium.webdriver.support import expected_conditions as EC
from selenium.webdriver.support.ui import WebDriverWait
";

    const DRIVER_FIXTURE: &str = "\
@pytest.fixture
def driver():
    driver = webdriver.Chrome()
    yield driver
    driver.quit()
";

    /// Where elements are looked up: the page, or an open shadow root.
    struct Scope {
        context: String,
        depth: usize,
    }

    pub(super) fn render(scenarios: &[&Scenario], base: &str) -> String {
        let mut out = String::from(HEADER);
        let _ = writeln!(out, "\nBASE_URL = {}\n\n", single_quoted(base));
        out.push_str(DRIVER_FIXTURE);

        for scenario in scenarios {
            let _ = writeln!(out, "\n\ndef test_{}(driver):", test_name(scenario));
            let _ = writeln!(out, "    \"\"\"{}: {}", scenario.id, scenario.title);
            let _ = writeln!(out, "\n    Expected: {}\n    \"\"\"", scenario.expected);
            out.push_str("    wait = WebDriverWait(driver, 10)\n");

            let scope = Scope {
                context: "driver".to_string(),
                depth: 0,
            };
            for step in &scenario.script {
                render_step(&mut out, step, &scope);
            }
        }
        out
    }

    fn locate(scope: &Scope, target: &Target) -> String {
        format!(
            "{}.find_element(By.CSS_SELECTOR, {})",
            scope.context,
            single_quoted(&target.css())
        )
    }

    fn render_step(out: &mut String, step: &Step, scope: &Scope) {
        let at_page = scope.context == "driver";
        match step {
            Step::Navigate { to } => {
                let _ = writeln!(out, "    driver.get(BASE_URL + {})", single_quoted(&to.path()));
            }
            Step::Fill { target, value } => {
                let _ = writeln!(out, "    field = {}", locate(scope, target));
                out.push_str("    field.clear()\n");
                let _ = writeln!(out, "    field.send_keys({})", single_quoted(value));
            }
            Step::Click { target } => {
                if at_page {
                    let _ = writeln!(
                        out,
                        "    wait.until(EC.element_to_be_clickable((By.CSS_SELECTOR, {}))).click()",
                        single_quoted(&target.css())
                    );
                } else {
                    let _ = writeln!(out, "    {}.click()", locate(scope, target));
                }
            }
            Step::Select { target, option } => {
                let _ = writeln!(out, "    {}.click()", locate(scope, target));
                let _ = writeln!(
                    out,
                    "    wait.until(EC.element_to_be_clickable((By.CSS_SELECTOR, {}))).click()",
                    single_quoted(&option.css())
                );
            }
            Step::ExpectVisible { target } => {
                if at_page {
                    let _ = writeln!(
                        out,
                        "    assert wait.until(EC.visibility_of_element_located((By.CSS_SELECTOR, {}))).is_displayed()",
                        single_quoted(&target.css())
                    );
                } else {
                    let _ = writeln!(out, "    assert {}.is_displayed()", locate(scope, target));
                }
            }
            Step::ExpectText { target, text } => {
                if at_page {
                    let _ = writeln!(
                        out,
                        "    wait.until(EC.text_to_be_present_in_element((By.CSS_SELECTOR, {}), {}))",
                        single_quoted(&target.css()),
                        single_quoted(text)
                    );
                } else {
                    let _ = writeln!(
                        out,
                        "    assert {} in {}.text",
                        single_quoted(text),
                        locate(scope, target)
                    );
                }
            }
            Step::AcceptDialog { message } => {
                out.push_str("    alert = wait.until(EC.alert_is_present())\n");
                if let Some(message) = message {
                    let _ = writeln!(out, "    assert alert.text == {}", single_quoted(message));
                }
                out.push_str("    alert.accept()\n");
            }
            Step::WithinFrame { frame, steps } => {
                let _ = writeln!(
                    out,
                    "    wait.until(EC.frame_to_be_available_and_switch_to_it((By.CSS_SELECTOR, {})))",
                    single_quoted(&frame.css())
                );
                let inner = Scope {
                    context: "driver".to_string(),
                    depth: scope.depth,
                };
                for step in steps {
                    render_step(out, step, &inner);
                }
                out.push_str("    driver.switch_to.default_content()\n");
            }
            Step::WithinShadowHost { host, steps } => {
                let depth = scope.depth + 1;
                let root = if depth == 1 {
                    "shadow_root".to_string()
                } else {
                    format!("shadow_root_{depth}")
                };
                let _ = writeln!(out, "    {root} = {}.shadow_root", locate(scope, host));
                let inner = Scope {
                    context: root,
                    depth,
                };
                for step in steps {
                    render_step(out, step, &inner);
                }
            }
        }
    }
}

mod playwright {
    use std::fmt::Write as _;

    use super::{Scenario, Step, Target, single_quoted};

    const HEADER: &str = "import { test, expect } from '@playwright/test';\n";

    struct Scope {
        locator: String,
    }

    impl Scope {
        fn page() -> Self {
            Self {
                locator: "page".to_string(),
            }
        }
    }

    /// Numbers the frame and shadow-host locals declared in one test body.
    #[derive(Default)]
    struct Locals {
        frames: usize,
        hosts: usize,
    }

    impl Locals {
        fn frame(&mut self) -> String {
            self.frames += 1;
            format!("frame{}", self.frames)
        }

        fn host(&mut self) -> String {
            self.hosts += 1;
            format!("host{}", self.hosts)
        }
    }

    pub(super) fn render(scenarios: &[&Scenario], base: &str) -> String {
        let mut out = String::from(HEADER);
        let _ = writeln!(out, "\nconst BASE_URL = {};", single_quoted(base));

        for scenario in scenarios {
            let name = format!("{}: {}", scenario.id, scenario.title);
            let _ = writeln!(
                out,
                "\ntest({}, async ({{ page }}) => {{",
                single_quoted(&name)
            );
            let _ = writeln!(out, "  // Expected: {}", scenario.expected);

            render_steps(&mut out, &scenario.script, &Scope::page(), &mut Locals::default());
            out.push_str("});\n");
        }
        out
    }

    fn locate(scope: &Scope, target: &Target) -> String {
        match target {
            Target::TestId(id) => format!("{}.getByTestId({})", scope.locator, single_quoted(id)),
            Target::Css { css } => format!("{}.locator({})", scope.locator, single_quoted(css)),
        }
    }

    /// Dialog handlers must be registered before the action that raises the
    /// dialog, so an `AcceptDialog` is emitted ahead of the step it follows.
    fn render_steps(out: &mut String, steps: &[Step], scope: &Scope, locals: &mut Locals) {
        let mut iter = steps.iter().peekable();
        while let Some(step) = iter.next() {
            if let Some(Step::AcceptDialog { message }) = iter.peek() {
                render_dialog_handler(out, message.as_deref());
                iter.next();
            } else if let Step::AcceptDialog { message } = step {
                render_dialog_handler(out, message.as_deref());
                continue;
            }
            render_step(out, step, scope, locals);
        }
    }

    fn render_dialog_handler(out: &mut String, message: Option<&str>) {
        out.push_str("  page.once('dialog', async (dialog) => {\n");
        if let Some(message) = message {
            let _ = writeln!(
                out,
                "    expect(dialog.message()).toBe({});",
                single_quoted(message)
            );
        }
        out.push_str("    await dialog.accept();\n  });\n");
    }

    fn render_step(out: &mut String, step: &Step, scope: &Scope, locals: &mut Locals) {
        match step {
            Step::Navigate { to } => {
                let _ = writeln!(
                    out,
                    "  await page.goto(BASE_URL + {});",
                    single_quoted(&to.path())
                );
            }
            Step::Fill { target, value } => {
                let _ = writeln!(
                    out,
                    "  await {}.fill({});",
                    locate(scope, target),
                    single_quoted(value)
                );
            }
            Step::Click { target } => {
                let _ = writeln!(out, "  await {}.click();", locate(scope, target));
            }
            Step::Select { target, option } => {
                let _ = writeln!(out, "  await {}.click();", locate(scope, target));
                let _ = writeln!(out, "  await {}.click();", locate(&Scope::page(), option));
            }
            Step::ExpectVisible { target } => {
                let _ = writeln!(out, "  await expect({}).toBeVisible();", locate(scope, target));
            }
            Step::ExpectText { target, text } => {
                let _ = writeln!(
                    out,
                    "  await expect({}).toContainText({});",
                    locate(scope, target),
                    single_quoted(text)
                );
            }
            Step::AcceptDialog { message } => render_dialog_handler(out, message.as_deref()),
            Step::WithinFrame { frame, steps } => {
                let name = locals.frame();
                let _ = writeln!(
                    out,
                    "  const {name} = {}.frameLocator({});",
                    scope.locator,
                    single_quoted(&frame.css())
                );
                render_steps(out, steps, &Scope { locator: name }, locals);
            }
            Step::WithinShadowHost { host, steps } => {
                // Playwright locators pierce open shadow roots.
                let name = locals.host();
                let _ = writeln!(out, "  const {name} = {};", locate(scope, host));
                render_steps(out, steps, &Scope { locator: name }, locals);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::scenarios;

    fn base() -> Url {
        Url::parse("http://localhost:8080/").unwrap()
    }

    fn one(id: &str) -> Vec<&'static Scenario> {
        vec![scenarios::find(id).unwrap()]
    }

    #[test]
    fn test_selenium_login() {
        let source = render(Framework::Selenium, &one("AUTH_001"), &base()).unwrap();
        assert!(source.starts_with("import pytest\n"));
        assert!(source.contains("BASE_URL = 'http://localhost:8080'"));
        assert!(source.contains("def test_auth_001_valid_admin_login(driver):"));
        assert!(source.contains("    driver.get(BASE_URL + '/login')\n"));
        assert!(source.contains(
            "    field = driver.find_element(By.CSS_SELECTOR, '[data-testid=\"email-input\"]')\n"
        ));
        assert!(source.contains("    field.send_keys('admin@test.com')\n"));
    }

    #[test]
    fn test_playwright_login() {
        let source = render(Framework::Playwright, &one("AUTH_001"), &base()).unwrap();
        assert!(source.starts_with("import { test, expect } from '@playwright/test';"));
        assert!(source.contains("test('AUTH_001: Valid Admin Login', async ({ page }) => {"));
        assert!(source.contains("  await page.goto(BASE_URL + '/login');\n"));
        assert!(source.contains("  await page.getByTestId('email-input').fill('admin@test.com');\n"));
        assert!(source.contains("  await expect(page.getByTestId('admin-panel')).toBeVisible();\n"));
        assert!(source.trim_end().ends_with("});"));
    }

    #[test]
    fn test_playwright_registers_dialog_before_click() {
        let source = render(Framework::Playwright, &one("SPECIAL_002"), &base()).unwrap();
        let handler = source.find("page.once('dialog'").unwrap();
        let click = source.find("await frame1.locator('button').click();").unwrap();
        assert!(handler < click);
        assert!(source.contains("expect(dialog.message()).toBe('Button clicked in iframe!');"));
        assert!(source.contains(
            "const frame1 = page.frameLocator('[data-testid=\"iframe-content-13\"]');"
        ));
    }

    #[test]
    fn test_playwright_sibling_scopes_get_distinct_locals() {
        let click = |id: &str| Step::Click {
            target: Target::TestId(id.to_string()),
        };
        let mut scenario = scenarios::find("SPECIAL_002").unwrap().clone();
        scenario.script = vec![
            Step::WithinFrame {
                frame: Target::TestId("frame-a".to_string()),
                steps: vec![click("a")],
            },
            Step::WithinFrame {
                frame: Target::TestId("frame-b".to_string()),
                steps: vec![Step::WithinShadowHost {
                    host: Target::TestId("host-b".to_string()),
                    steps: vec![click("b")],
                }],
            },
            Step::WithinShadowHost {
                host: Target::TestId("host-c".to_string()),
                steps: vec![click("c")],
            },
        ];

        let source = render(Framework::Playwright, &[&scenario], &base()).unwrap();
        assert_eq!(source.matches("const frame1 ").count(), 1);
        assert_eq!(source.matches("const frame2 ").count(), 1);
        assert!(source.contains("const host1 = frame2.getByTestId('host-b');"));
        assert!(source.contains("const host2 = page.getByTestId('host-c');"));
        assert!(source.contains("await host1.getByTestId('b').click();"));

        // Numbering restarts in each test body.
        let twice = render(Framework::Playwright, &[&scenario, &scenario], &base()).unwrap();
        assert_eq!(twice.matches("const frame1 ").count(), 2);
    }

    #[test]
    fn test_selenium_frame_and_shadow_scopes() {
        let frame = render(Framework::Selenium, &one("SPECIAL_002"), &base()).unwrap();
        let switch = frame.find("frame_to_be_available_and_switch_to_it").unwrap();
        let alert = frame.find("EC.alert_is_present()").unwrap();
        let back = frame.find("driver.switch_to.default_content()").unwrap();
        assert!(switch < alert && alert < back);

        let shadow = render(Framework::Selenium, &one("SPECIAL_004"), &base()).unwrap();
        assert!(shadow.contains(
            "    shadow_root = driver.find_element(By.CSS_SELECTOR, '[data-testid=\"shadow-host-14\"]').shadow_root\n"
        ));
        assert!(shadow.contains(
            "    shadow_root.find_element(By.CSS_SELECTOR, '[data-testid=\"shadow-button-14\"]').click()\n"
        ));
    }

    #[test]
    fn test_base_url_path_prefix() {
        let base = Url::parse("https://qa.example.com/testmart/").unwrap();
        let source = render(Framework::Playwright, &one("CART_006"), &base).unwrap();
        assert!(source.contains("const BASE_URL = 'https://qa.example.com/testmart';"));
    }

    #[test]
    fn test_unscripted_and_empty() {
        assert_eq!(
            render(Framework::Selenium, &one("SPECIAL_008"), &base()),
            Err(SnippetError::NoScript("SPECIAL_008".to_string()))
        );
        assert_eq!(
            render(Framework::Playwright, &[], &base()),
            Err(SnippetError::Empty)
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        assert_eq!(single_quoted("it's"), "'it\\'s'");
        assert_eq!(single_quoted("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn test_every_scripted_scenario_renders() {
        let scripted: Vec<&Scenario> = scenarios::all().iter().filter(|s| s.has_script()).collect();
        for framework in [Framework::Selenium, Framework::Playwright] {
            let source = render(framework, &scripted, &base()).unwrap();
            for scenario in &scripted {
                assert!(source.contains(&scenario.id), "{framework} {}", scenario.id);
            }
        }
    }
}

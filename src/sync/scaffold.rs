//! Scaffold files for scenarios linked from journeys but not yet written.

use crate::domain::Journey;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::Path;

/// Gherkin scenario for one journey step.
pub fn scenario_template(journey: &Journey, step: &str) -> String {
    let actor = if journey.actor.is_empty() { "User" } else { journey.actor.as_str() };
    format!(
        "Feature: {feature}\n\n  Scenario: {step}\n    Given I am a {actor}\n    When I {action}\n    Then the action is completed successfully\n",
        feature = journey.name,
        action = step.to_lowercase(),
    )
}

/// Test stub bound to a scenario file.
pub fn test_template(scenario_path: &str, scenario_name: &str) -> String {
    format!(
        r#"import {{ describeFeature, loadFeature }} from "@amiceli/vitest-cucumber";
import {{ expect }} from "vitest";

const feature = await loadFeature("{scenario_path}");

describeFeature(feature, ({{ Scenario }}) => {{
	Scenario("{scenario_name}", ({{ Given, When, Then }}) => {{
		Given(/I am a (.+)/, (actor: string) => {{
			// set up actor context
		}});

		When(/I (.+)/, (action: string) => {{
			// perform action
		}});

		Then("the action is completed successfully", () => {{
			expect(true).toBe(true);
		}});
	}});
}});
"#,
        scenario_name = scenario_name.replace('"', "\\\""),
    )
}

/// Write `content` to a new file, creating parent directories. Returns `Ok(false)`
/// without touching anything when the file already exists.
pub fn write_new(path: &Path, content: &str) -> io::Result<bool> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e),
    };
    file.write_all(content.as_bytes())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn journey(actor: &str) -> Journey {
        Journey {
            id: "onboarding".to_string(),
            name: "Onboarding".to_string(),
            actor: actor.to_string(),
            goal: String::new(),
            steps: Vec::new(),
            path: PathBuf::from("product/journeys/onboarding.md"),
            hash: String::new(),
        }
    }

    #[test]
    fn scenario_uses_journey_and_step() {
        let text = scenario_template(&journey("visitor"), "Create an Account");
        assert!(text.starts_with("Feature: Onboarding\n"));
        assert!(text.contains("  Scenario: Create an Account\n"));
        assert!(text.contains("Given I am a visitor\n"));
        assert!(text.contains("When I create an account\n"));
    }

    #[test]
    fn scenario_actor_defaults_to_user() {
        assert!(scenario_template(&journey(""), "Sign up").contains("Given I am a User"));
    }

    #[test]
    fn test_stub_references_scenario() {
        let text = test_template("specs/auth/signup.feature", "Sign up");
        assert!(text.contains(r#"loadFeature("specs/auth/signup.feature")"#));
        assert!(text.contains(r#"Scenario("Sign up""#));
    }

    #[test]
    fn write_new_never_overwrites() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("a/b/c.feature");
        assert!(write_new(&path, "first").expect("write"));
        assert!(!write_new(&path, "second").expect("write"));
        assert_eq!(fs::read_to_string(&path).expect("read"), "first");
    }
}

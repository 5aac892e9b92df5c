//! Static wizard layout: steps, their subpages, and the fields each subpage
//! must validate before the navigator lets the user move on.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{IntakeError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subpage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl Subpage {
    pub fn new(id: &str, name: &str, fields: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            fields: fields.iter().map(|field| field.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub name: String,
    pub subpages: Vec<Subpage>,
}

impl Step {
    pub fn new(id: &str, name: &str, subpages: Vec<Subpage>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            subpages,
        }
    }

    pub fn subpage_count(&self) -> usize {
        self.subpages.len()
    }
}

/// Current place in the wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FormPosition {
    pub step: usize,
    pub substep: usize,
}

impl FormPosition {
    pub const START: FormPosition = FormPosition { step: 0, substep: 0 };

    pub fn new(step: usize, substep: usize) -> Self {
        Self { step, substep }
    }

    pub fn is_start(&self) -> bool {
        *self == Self::START
    }
}

/// Ordered, read-only list of steps loaded once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StepCatalog {
    steps: Vec<Step>,
}

impl StepCatalog {
    /// Builds a catalog, rejecting layouts the navigator cannot walk.
    pub fn new(steps: Vec<Step>) -> Result<Self> {
        if steps.is_empty() {
            return Err(IntakeError::Config("step catalog has no steps".into()));
        }
        if let Some(step) = steps.iter().find(|step| step.subpages.is_empty()) {
            return Err(IntakeError::Config(format!(
                "step `{}` has no subpages",
                step.id
            )));
        }
        Ok(Self { steps })
    }

    /// The agency intake layout used when no steps file is configured.
    pub fn standard() -> Self {
        Self {
            steps: vec![
                Step::new(
                    "agency",
                    "Agency Information",
                    vec![
                        Subpage::new(
                            "profile",
                            "Agency Profile",
                            &[
                                "legal_name",
                                "director_name",
                                "main_phone",
                                "email",
                                "physical_address",
                                "mission",
                            ],
                        ),
                        Subpage::new(
                            "contact",
                            "Contact Information",
                            &["contact_name", "contact_phone"],
                        ),
                        Subpage::new("hours", "Hours of Operation", &["regular_days_open"]),
                    ],
                ),
                Step::new(
                    "services",
                    "Services",
                    vec![Subpage::new("services", "Services Offered", &["services"])],
                ),
                Step::new(
                    "organization",
                    "Organization",
                    vec![
                        Subpage::new(
                            "funding",
                            "Funding and Languages",
                            &["funding_sources", "languages", "non_profit"],
                        ),
                        Subpage::new(
                            "opportunities",
                            "Opportunities",
                            &[
                                "volunteers",
                                "vol_reqs",
                                "vol_coor",
                                "vol_coor_tel",
                                "donation",
                                "don_ex",
                                "pickup",
                                "pickup_loc",
                                "don_coor",
                                "don_coor_tel",
                                "recommendation",
                                "recommendations_contact",
                            ],
                        ),
                    ],
                ),
                Step::new(
                    "review",
                    "Review",
                    vec![Subpage::new("review", "Review and Submit", &["submitter_name"])],
                ),
            ],
        }
    }

    /// Reads an ordered list of steps from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let steps: Vec<Step> = serde_json::from_str(&data)
            .map_err(|err| IntakeError::Config(format!("{}: {}", path.display(), err)))?;
        Self::new(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn subpage(&self, position: FormPosition) -> Option<&Subpage> {
        self.step(position.step)
            .and_then(|step| step.subpages.get(position.substep))
    }

    /// Final subpage of the final step.
    pub fn last_position(&self) -> FormPosition {
        let step = self.steps.len().saturating_sub(1);
        let substep = self
            .steps
            .last()
            .map(|step| step.subpage_count().saturating_sub(1))
            .unwrap_or(0);
        FormPosition::new(step, substep)
    }

    pub fn total_subpages(&self) -> usize {
        self.steps.iter().map(Step::subpage_count).sum()
    }

    /// Every field name referenced by any subpage, in layout order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .flat_map(|step| step.subpages.iter())
            .flat_map(|subpage| subpage.fields.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_layout_is_walkable() {
        let catalog = StepCatalog::standard();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.total_subpages(), 7);
        assert_eq!(catalog.last_position(), FormPosition::new(3, 0));
        assert!(StepCatalog::new(catalog.steps().to_vec()).is_ok());
    }

    #[test]
    fn rejects_empty_layouts() {
        assert!(StepCatalog::new(Vec::new()).is_err());
        let hollow = vec![Step::new("empty", "Empty", Vec::new())];
        assert!(matches!(
            StepCatalog::new(hollow),
            Err(IntakeError::Config(_))
        ));
    }

    #[test]
    fn subpage_lookup_by_position() {
        let catalog = StepCatalog::standard();
        let subpage = catalog.subpage(FormPosition::new(2, 1)).unwrap();
        assert_eq!(subpage.id, "opportunities");
        assert!(catalog.subpage(FormPosition::new(1, 1)).is_none());
    }
}

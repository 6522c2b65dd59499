//! Lead capture: fields, validation and the multi-step wizard.

pub mod field;
pub mod validation;
pub mod wizard;

pub use field::{Field, LeadRecord, Step, CONTACT_STEP, STEPS};
pub use validation::{normalize_url, sanitize_input, InstagramRule, Validator};
pub use wizard::{Advance, Submission, WizardState};

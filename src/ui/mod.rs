pub mod form_field;
pub mod terminal_guard;
pub mod wizard_view;

pub use form_field::TextInput;
pub use wizard_view::WizardView;

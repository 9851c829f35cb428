pub mod collapsible_card;
pub mod confirm_dialog;
pub mod fade_in;
pub mod list_editor;
pub mod loading_spinner;
pub mod notification;
pub mod quick_action;
pub mod stat_counter;

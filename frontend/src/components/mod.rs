pub mod layout;
pub mod resource_form;
pub mod resource_list;
pub mod widgets;

use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct FormBuilderProps {
    pub scholarship_id: String,
    pub scholarship_name: String,
}

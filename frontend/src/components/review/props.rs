use common::model::scholarship::Scholarship;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ReviewProps {
    /// Used for the filter and to show names instead of ids.
    #[prop_or_default]
    pub scholarships: Vec<Scholarship>,
}

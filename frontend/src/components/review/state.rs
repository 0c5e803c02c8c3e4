use common::model::application::{Application, ApplicationStatus};
use yew::NodeRef;

/// Pending award dialog input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AwardForm {
    pub application_id: String,
    pub amount: String,
    pub date: String,
}

pub struct ReviewBoard {
    pub applications: Vec<Application>,
    pub scholarship_filter: Option<String>,
    pub status_filter: Option<ApplicationStatus>,
    pub award: Option<AwardForm>,
    pub loading: bool,
    pub load_error: Option<String>,
    pub loaded: bool,
    pub award_sheet: NodeRef,
}

impl ReviewBoard {
    pub fn new() -> Self {
        Self {
            applications: Vec::new(),
            scholarship_filter: None,
            status_filter: None,
            award: None,
            loading: false,
            load_error: None,
            loaded: false,
            award_sheet: NodeRef::default(),
        }
    }

    pub fn replace(&mut self, updated: Application) {
        if let Some(row) = self.applications.iter_mut().find(|a| a.id == updated.id) {
            *row = updated;
        }
    }
}

/// Plain status changes offered for an application in `status`. Awarding and
/// removing an award have their own actions.
pub fn available_transitions(status: ApplicationStatus) -> Vec<ApplicationStatus> {
    if status == ApplicationStatus::Awarded {
        return Vec::new();
    }
    ApplicationStatus::ALL
        .into_iter()
        .filter(|next| *next != ApplicationStatus::Awarded && status.can_transition_to(*next))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_the_review_lattice() {
        use ApplicationStatus::*;
        assert_eq!(available_transitions(Submitted), vec![UnderReview]);
        assert_eq!(available_transitions(UnderReview), vec![Approved, Rejected]);
        assert!(available_transitions(Draft).is_empty());
        assert!(available_transitions(Approved).is_empty());
        assert!(available_transitions(Awarded).is_empty());
    }

    #[test]
    fn replace_swaps_the_matching_row() {
        let mut board = ReviewBoard::new();
        let mut first = Application::new("s1");
        first.id = Some("a1".into());
        let mut second = Application::new("s1");
        second.id = Some("a2".into());
        board.applications = vec![first, second.clone()];

        second.status = ApplicationStatus::UnderReview;
        board.replace(second);
        assert_eq!(board.applications[1].status, ApplicationStatus::UnderReview);
        assert_eq!(board.applications[0].status, ApplicationStatus::Draft);
    }
}

//! Test data builders
//!
//! Random but valid users, courses and programs for integration tests.

use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{Name, Title};
use fake::Fake;
use uuid::Uuid;
use MentorWeb::models::{AccountType, CreateProgramRequest, CreateUserRequest};

/// A user request with a random name and a unique address
pub fn user_request(account_type: AccountType) -> CreateUserRequest {
    let name: String = Name().fake();
    let unique = Uuid::new_v4().simple().to_string();

    CreateUserRequest {
        name,
        email: format!("{}.{}@example.edu", account_type, &unique[..12]),
        pronouns: Some("they/them".to_string()),
        title: if account_type.can_host() { Some(Title().fake()) } else { None },
        account_type,
    }
}

/// Program settings used by most tests; tweak the returned value as needed
pub fn program_request(instructor_id: i64, course_id: Option<i64>) -> CreateProgramRequest {
    let description: String = Sentence(3..6).fake();

    CreateProgramRequest {
        name: "Office Hours".to_string(),
        description: Some(description),
        instructor_id,
        course_id,
        duration: Some(30),
        physical_location: Some("Room 204".to_string()),
        meeting_url: None,
        auto_approve_appointments: true,
        max_daily_meetings: None,
        max_weekly_meetings: None,
        max_monthly_meetings: None,
        is_dropins: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_requests_are_unique() {
        let a = user_request(AccountType::Student);
        let b = user_request(AccountType::Student);
        assert_ne!(a.email, b.email);
        assert!(a.title.is_none());
        assert!(user_request(AccountType::Mentor).title.is_some());
    }
}

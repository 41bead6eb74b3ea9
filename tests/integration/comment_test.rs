//! Appointment comments

use assert_matches::assert_matches;
use MentorWeb::MentorWebError;

integration_test!(test_comment_lifecycle, |ctx| {
    let host = ctx.create_host().await;
    let student = ctx.create_student().await;
    let program = ctx.create_program(&host, None, |_| {}).await;
    let (_, slots) = ctx.post_window(&host, &program, 1, "10:00", "11:00").await;
    let appointment_id = slots[0].id;
    let service = &ctx.services.comment_service;

    let first = service.add_comment(student.id, appointment_id, "  Can we cover recursion? ").await.unwrap();
    assert_eq!(first.appointment_comment, "Can we cover recursion?");
    let second = service.add_comment(host.id, appointment_id, "Sure, bring examples.").await.unwrap();

    let comments = service.list_comments(appointment_id).await.unwrap();
    assert_eq!(comments.iter().map(|c| c.id).collect::<Vec<_>>(), vec![first.id, second.id]);
    assert_eq!(comments[0].name, student.name);
    assert_eq!(comments[1].title, host.title);

    // Only the author may delete, and only through the right appointment
    assert_matches!(
        service.delete_comment(host.id, appointment_id, first.id).await,
        Err(MentorWebError::PermissionDenied(_))
    );
    assert_matches!(
        service.delete_comment(student.id, slots[1].id, first.id).await,
        Err(MentorWebError::CommentNotFound { .. })
    );

    service.delete_comment(student.id, appointment_id, first.id).await.unwrap();
    let comments = service.list_comments(appointment_id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, second.id);
});

integration_test!(test_comment_requires_user_and_appointment, |ctx| {
    let host = ctx.create_host().await;
    let program = ctx.create_program(&host, None, |_| {}).await;
    let (_, slots) = ctx.post_window(&host, &program, 1, "10:00", "10:30").await;
    let service = &ctx.services.comment_service;

    assert_matches!(
        service.add_comment(123_456, slots[0].id, "hello").await,
        Err(MentorWebError::UserNotFound { user_id: 123_456 })
    );
    assert_matches!(
        service.add_comment(host.id, 654_321, "hello").await,
        Err(MentorWebError::AppointmentNotFound { appointment_id: 654_321 })
    );
    assert_matches!(
        service.list_comments(654_321).await,
        Err(MentorWebError::AppointmentNotFound { .. })
    );
});

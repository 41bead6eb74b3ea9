//! Availability posting, toggling and listing

use assert_matches::assert_matches;
use chrono::NaiveTime;
use MentorWeb::models::*;
use MentorWeb::MentorWebError;

fn entry(program_id: i64, date: String, start: &str, end: &str) -> AvailabilityEntry {
    AvailabilityEntry {
        id: program_id,
        date,
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

integration_test!(test_window_is_split_into_slots, |ctx| {
    let host = ctx.create_host().await;
    let course = ctx.create_course(&host).await;
    let program = ctx.create_program(&host, Some(&course), |_| {}).await;

    let (availability_id, slots) = ctx.post_window(&host, &program, 1, "10:00", "11:15").await;

    assert_eq!(slots.len(), 2);
    assert_eq!((slots[0].start_time, slots[0].end_time), (time(10, 0), time(10, 30)));
    assert_eq!((slots[1].start_time, slots[1].end_time), (time(10, 30), time(11, 0)));
    for slot in &slots {
        assert_eq!(slot.status, AppointmentStatus::Posted);
        assert_eq!(slot.instructor_id, host.id);
        assert_eq!(slot.physical_location.as_deref(), Some("Room 204"));
        assert!(slot.attendee_id.is_none());
    }

    let availability = ctx.availability(availability_id).await;
    assert_eq!(availability.status, AvailabilityStatus::Active);
    assert_eq!(availability.program_id, program.id);
});

integration_test!(test_request_settings_override_program, |ctx| {
    let host = ctx.create_host().await;
    let program = ctx.create_program(&host, None, |p| p.duration = Some(15)).await;

    let request = PostAvailabilityRequest {
        course_id: None,
        availabilities: vec![entry(program.id, ctx.day(2), "13:00", "14:00")],
        duration: Some(20),
        physical_location: Some("Library".to_string()),
        meeting_url: Some("https://meet.example.com/oh".to_string()),
    };
    let report = ctx.services.availability_service.create_availabilities(host.id, request).await.unwrap();
    assert_matches!(report.entries[0], EntryOutcome::Created { slots: 3, .. });

    let EntryOutcome::Created { availability_id, .. } = report.entries[0] else { unreachable!() };
    let slots = ctx.services.availability_service.slots(availability_id).await.unwrap();
    assert!(slots.iter().all(|s| s.physical_location.as_deref() == Some("Library")));
    assert!(slots.iter().all(|s| s.meeting_url.as_deref() == Some("https://meet.example.com/oh")));
});

integration_test!(test_program_without_duration_gets_single_slot, |ctx| {
    let host = ctx.create_host().await;
    let program = ctx.create_program(&host, None, |p| p.duration = None).await;

    let (_, slots) = ctx.post_window(&host, &program, 1, "09:00", "12:00").await;
    assert_eq!(slots.len(), 1);
    assert_eq!((slots[0].start_time, slots[0].end_time), (time(9, 0), time(12, 0)));
});

integration_test!(test_batch_reports_each_entry, |ctx| {
    let host = ctx.create_host().await;
    let program = ctx.create_program(&host, None, |_| {}).await;
    ctx.post_window(&host, &program, 1, "10:00", "11:00").await;

    let request = PostAvailabilityRequest {
        availabilities: vec![
            entry(program.id, ctx.day(1), "10:30", "11:30"),   // overlaps
            entry(program.id, ctx.day(1), "11:00", "12:00"),   // touches, fine
            entry(program.id, ctx.day(-1), "10:00", "11:00"),  // past date
            entry(program.id, ctx.day(3), "10:00", "10:20"),   // too short
            entry(program.id, "03/01/2030".to_string(), "10:00", "11:00"),
            entry(program.id, ctx.day(0), "08:00", "09:00"),   // today, already over
            entry(999_999, ctx.day(2), "10:00", "11:00"),
        ],
        ..Default::default()
    };

    let report = ctx.services.availability_service.create_availabilities(host.id, request).await.unwrap();
    assert_eq!(report.entries.len(), 7);
    assert_eq!(report.created(), 1);
    assert_eq!(report.rejected(), 6);
    assert_matches!(report.entries[1], EntryOutcome::Created { slots: 2, .. });

    let EntryOutcome::Rejected { reason } = &report.entries[0] else { panic!("overlap accepted") };
    assert!(reason.contains("conflict"));
    let EntryOutcome::Rejected { reason } = &report.entries[6] else { panic!("unknown program accepted") };
    assert!(reason.contains("Program not found"));

    assert_eq!(ctx.database.count_records("availabilities").await.unwrap(), 2);
    assert_eq!(ctx.database.count_records("appointments").await.unwrap(), 4);
});

integration_test!(test_same_window_for_other_program_is_allowed, |ctx| {
    let host = ctx.create_host().await;
    let first = ctx.create_program(&host, None, |_| {}).await;
    let second = ctx.create_program(&host, None, |p| p.name = "Thesis Advising".to_string()).await;

    ctx.post_window(&host, &first, 1, "10:00", "11:00").await;
    let (_, slots) = ctx.post_window(&host, &second, 1, "10:00", "11:00").await;
    assert_eq!(slots.len(), 2);
});

integration_test!(test_students_cannot_post, |ctx| {
    let student = ctx.create_student().await;
    let host = ctx.create_host().await;
    let program = ctx.create_program(&host, None, |_| {}).await;

    let request = PostAvailabilityRequest {
        availabilities: vec![entry(program.id, ctx.day(1), "10:00", "11:00")],
        ..Default::default()
    };
    let result = ctx.services.availability_service.create_availabilities(student.id, request).await;
    assert_matches!(result, Err(MentorWebError::PermissionDenied(_)));
});

integration_test!(test_foreign_course_is_rejected, |ctx| {
    let host = ctx.create_host().await;
    let other = ctx.create_host().await;
    let foreign_course = ctx.create_course(&other).await;
    let program = ctx.create_program(&host, None, |_| {}).await;

    let request = PostAvailabilityRequest {
        course_id: Some(foreign_course.id),
        availabilities: vec![entry(program.id, ctx.day(1), "10:00", "11:00")],
        ..Default::default()
    };
    let report = ctx.services.availability_service.create_availabilities(host.id, request).await.unwrap();
    let EntryOutcome::Rejected { reason } = &report.entries[0] else { panic!("foreign course accepted") };
    assert!(reason.contains("Course not found"));
});

integration_test!(test_foreign_program_is_rejected, |ctx| {
    let host = ctx.create_host().await;
    let other = ctx.create_host().await;
    let foreign_program = ctx.create_program(&other, None, |p| p.max_daily_meetings = Some(1)).await;

    let request = PostAvailabilityRequest {
        availabilities: vec![entry(foreign_program.id, ctx.day(1), "10:00", "11:00")],
        ..Default::default()
    };
    let report = ctx.services.availability_service.create_availabilities(host.id, request).await.unwrap();
    let EntryOutcome::Rejected { reason } = &report.entries[0] else { panic!("foreign program accepted") };
    assert!(reason.starts_with("Permission denied"));
    assert_eq!(ctx.database.count_records("availabilities").await.unwrap(), 0);
    assert_eq!(ctx.database.count_records("appointments").await.unwrap(), 0);
});

integration_test!(test_dropin_windows_have_no_slots, |ctx| {
    let host = ctx.create_host().await;
    let course = ctx.create_course(&host).await;
    let dropin = ctx.create_program(&host, Some(&course), |p| {
        p.name = "Drop-in Lab".to_string();
        p.is_dropins = true;
    }).await;
    let global_dropin = ctx.create_program(&host, None, |p| {
        p.name = "Open Door".to_string();
        p.is_dropins = true;
    }).await;
    let regular = ctx.create_program(&host, Some(&course), |_| {}).await;

    let (dropin_window, slots) = ctx.post_window(&host, &dropin, 1, "14:00", "16:00").await;
    assert!(slots.is_empty());
    let (global_window, _) = ctx.post_window(&host, &global_dropin, 2, "14:00", "16:00").await;
    ctx.post_window(&host, &regular, 1, "10:00", "11:00").await;

    let windows = ctx.services.availability_service.list_dropin_windows(course.id).await.unwrap();
    let ids: Vec<i64> = windows.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![dropin_window, global_window]);
    assert!(windows.iter().all(|w| w.is_dropins));

    let missing = ctx.services.availability_service.list_dropin_windows(424_242).await;
    assert_matches!(missing, Err(MentorWebError::CourseNotFound { course_id: 424_242 }));
});

integration_test!(test_toggle_status_moves_open_slots, |ctx| {
    let host = ctx.create_host().await;
    let student = ctx.create_student().await;
    let program = ctx.create_program(&host, None, |_| {}).await;
    let (availability_id, slots) = ctx.post_window(&host, &program, 1, "10:00", "11:30").await;

    ctx.services.reservation_service.reserve(student.id, slots[0].id, None, None).await.unwrap();

    let service = &ctx.services.availability_service;
    let off = service.set_availability_status(host.id, availability_id, AvailabilityStatus::Inactive).await.unwrap();
    assert_eq!(off.status, AvailabilityStatus::Inactive);
    assert_eq!(ctx.appointment(slots[0].id).await.status, AppointmentStatus::Reserved);
    assert_eq!(ctx.appointment(slots[1].id).await.status, AppointmentStatus::Inactive);
    assert_eq!(ctx.appointment(slots[2].id).await.status, AppointmentStatus::Inactive);

    let on = service.set_availability_status(host.id, availability_id, AvailabilityStatus::Active).await.unwrap();
    assert_eq!(on.status, AvailabilityStatus::Active);
    assert_eq!(ctx.appointment(slots[0].id).await.status, AppointmentStatus::Reserved);
    assert_eq!(ctx.appointment(slots[1].id).await.status, AppointmentStatus::Posted);
});

integration_test!(test_reactivation_respects_limits, |ctx| {
    let host = ctx.create_host().await;
    let student = ctx.create_student().await;
    let program = ctx.create_program(&host, None, |p| p.max_weekly_meetings = Some(1)).await;
    let (first, slots) = ctx.post_window(&host, &program, 1, "10:00", "11:00").await;
    let (second, _) = ctx.post_window(&host, &program, 2, "10:00", "11:00").await;

    // Booking the only weekly meeting closes the rest of the week
    let outcome = ctx.services.reservation_service.reserve(student.id, slots[0].id, None, None).await.unwrap();
    assert_eq!(outcome.cascaded, Some(MentorWeb::scheduling::QuotaScope::Weekly));
    assert_eq!(ctx.availability(second).await.status, AvailabilityStatus::Inactive);

    let result = ctx.services.availability_service
        .set_availability_status(host.id, second, AvailabilityStatus::Active)
        .await;
    assert_matches!(result, Err(MentorWebError::LimitReached(MentorWeb::scheduling::QuotaScope::Weekly)));
    assert_eq!(ctx.availability(second).await.status, AvailabilityStatus::Inactive);
    assert_eq!(ctx.availability(first).await.status, AvailabilityStatus::Inactive);
});

integration_test!(test_only_owner_can_toggle_or_delete, |ctx| {
    let host = ctx.create_host().await;
    let other = ctx.create_host().await;
    let program = ctx.create_program(&host, None, |_| {}).await;
    let (availability_id, _) = ctx.post_window(&host, &program, 1, "10:00", "11:00").await;

    let service = &ctx.services.availability_service;
    assert_matches!(
        service.set_availability_status(other.id, availability_id, AvailabilityStatus::Inactive).await,
        Err(MentorWebError::PermissionDenied(_))
    );
    assert_matches!(
        service.delete_availability(other.id, availability_id).await,
        Err(MentorWebError::PermissionDenied(_))
    );
    assert_matches!(
        service.delete_availability(host.id, 777_777).await,
        Err(MentorWebError::AvailabilityNotFound { availability_id: 777_777 })
    );

    service.delete_availability(host.id, availability_id).await.unwrap();
    assert_eq!(ctx.database.count_records("availabilities").await.unwrap(), 0);
    assert_eq!(ctx.database.count_records("appointments").await.unwrap(), 0);
});

integration_test!(test_list_availabilities_by_course, |ctx| {
    let host = ctx.create_host().await;
    let course = ctx.create_course(&host).await;
    let course_program = ctx.create_program(&host, Some(&course), |_| {}).await;
    let global_program = ctx.create_program(&host, None, |_| {}).await;

    let (later, _) = ctx.post_window(&host, &course_program, 3, "10:00", "11:00").await;
    let (sooner, _) = ctx.post_window(&host, &course_program, 1, "10:00", "11:00").await;
    let (global, _) = ctx.post_window(&host, &global_program, 1, "15:00", "16:00").await;
    // Today's windows are not listed
    ctx.post_window(&host, &course_program, 0, "15:00", "16:00").await;

    let service = &ctx.services.availability_service;
    let listed = service.list_availabilities(host.id, Some(course.id)).await.unwrap();
    assert_eq!(listed.iter().map(|l| l.id).collect::<Vec<_>>(), vec![sooner, later]);
    assert_eq!(listed[0].course_name.as_deref(), Some("CS 101"));

    let listed = service.list_availabilities(host.id, None).await.unwrap();
    assert_eq!(listed.iter().map(|l| l.id).collect::<Vec<_>>(), vec![global]);
});

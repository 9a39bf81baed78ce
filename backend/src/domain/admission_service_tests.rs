//! Tests for the admission service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    BulkApprovalOutcome, CourseCatalogueError, EnrollmentRepositoryError, MockCourseCatalogue,
    MockEnrollmentRepository, MockStudentRepository,
};
use crate::domain::{CourseCapacity, ErrorCode, Role};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

type Service =
    AdmissionService<MockCourseCatalogue, MockStudentRepository, MockEnrollmentRepository>;

fn service(
    courses: MockCourseCatalogue,
    students: MockStudentRepository,
    enrollments: MockEnrollmentRepository,
) -> Service {
    AdmissionService::new(
        Arc::new(courses),
        Arc::new(students),
        Arc::new(enrollments),
        Arc::new(FixtureClock {
            utc_now: fixture_now(),
        }),
    )
}

#[fixture]
fn admin() -> Principal {
    Principal::new(UserId::random(), Role::Administrator)
}

#[fixture]
fn student() -> Principal {
    Principal::new(UserId::random(), Role::Student)
}

fn course_with(max: u32, current: u32) -> Course {
    Course::new(
        CourseId::random(),
        "Linear Algebra",
        "lecture",
        CourseCapacity::new(max, current).expect("valid counters"),
    )
    .expect("valid course")
}

fn catalogue_returning(course: Course) -> MockCourseCatalogue {
    let mut courses = MockCourseCatalogue::new();
    courses
        .expect_find_course()
        .times(1)
        .return_once(move |_| Ok(Some(course)));
    courses
}

fn students_returning(student_id: UserId) -> MockStudentRepository {
    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(Student::new(student_id, "North High", None))));
    students
}

fn enrollments_finding(enrollment: Enrollment) -> MockEnrollmentRepository {
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(enrollment)));
    enrollments
}

fn pending_for(student_id: UserId) -> Enrollment {
    Enrollment::request(student_id, CourseId::random(), fixture_now())
}

fn decide(principal: Principal, enrollment: &Enrollment) -> DecideEnrollmentRequest {
    DecideEnrollmentRequest {
        principal,
        enrollment_id: enrollment.id(),
    }
}

#[rstest]
#[tokio::test]
async fn request_creates_pending_enrollment(student: Principal) {
    let course = course_with(2, 1);
    let course_id = course.id();
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_create_pending()
        .times(1)
        .withf(|e| e.status() == EnrollmentStatus::Pending)
        .return_once(|_| Ok(EnrollmentInsert::Created));

    let svc = service(
        catalogue_returning(course),
        students_returning(student.user_id()),
        enrollments,
    );
    let enrollment = svc
        .request_enrollment(RequestEnrollmentRequest {
            principal: student,
            student_id: student.user_id(),
            course_id,
        })
        .await
        .expect("request succeeds");

    assert_eq!(enrollment.status(), EnrollmentStatus::Pending);
    assert_eq!(enrollment.course_id(), course_id);
    assert_eq!(enrollment.requested_at(), fixture_now());
    assert!(enrollment.decided_by().is_none());
}

#[rstest]
#[tokio::test]
async fn request_on_full_course_is_refused_without_writing(student: Principal) {
    let course = course_with(1, 1);
    let course_id = course.id();
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments.expect_create_pending().times(0);

    let svc = service(
        catalogue_returning(course),
        students_returning(student.user_id()),
        enrollments,
    );
    let err = svc
        .request_enrollment(RequestEnrollmentRequest {
            principal: student,
            student_id: student.user_id(),
            course_id,
        })
        .await
        .expect_err("full course refuses");

    assert_eq!(err.code(), ErrorCode::CourseFull);
    assert_eq!(err.message(), format!("course {course_id} has no free seats"));
}

#[rstest]
#[tokio::test]
async fn request_for_another_student_is_forbidden(student: Principal) {
    let svc = service(
        MockCourseCatalogue::new(),
        MockStudentRepository::new(),
        MockEnrollmentRepository::new(),
    );
    let err = svc
        .request_enrollment(RequestEnrollmentRequest {
            principal: student,
            student_id: UserId::random(),
            course_id: CourseId::random(),
        })
        .await
        .expect_err("cannot act for others");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn administrators_may_request_on_behalf_of_students(admin: Principal) {
    let student_id = UserId::random();
    let course = course_with(3, 0);
    let course_id = course.id();
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_create_pending()
        .times(1)
        .withf(move |e| e.student_id() == student_id)
        .return_once(|_| Ok(EnrollmentInsert::Created));

    let svc = service(catalogue_returning(course), students_returning(student_id), enrollments);
    let enrollment = svc
        .request_enrollment(RequestEnrollmentRequest {
            principal: admin,
            student_id,
            course_id,
        })
        .await
        .expect("admin may request");

    assert_eq!(enrollment.student_id(), student_id);
}

#[rstest]
#[tokio::test]
async fn request_for_unknown_course_is_not_found(student: Principal) {
    let mut courses = MockCourseCatalogue::new();
    courses
        .expect_find_course()
        .times(1)
        .return_once(|_| Ok(None));

    let svc = service(
        courses,
        students_returning(student.user_id()),
        MockEnrollmentRepository::new(),
    );
    let err = svc
        .request_enrollment(RequestEnrollmentRequest {
            principal: student,
            student_id: student.user_id(),
            course_id: CourseId::random(),
        })
        .await
        .expect_err("unknown course");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn request_for_unknown_student_is_not_found(admin: Principal) {
    let mut students = MockStudentRepository::new();
    students.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let svc = service(MockCourseCatalogue::new(), students, MockEnrollmentRepository::new());
    let err = svc
        .request_enrollment(RequestEnrollmentRequest {
            principal: admin,
            student_id: UserId::random(),
            course_id: CourseId::random(),
        })
        .await
        .expect_err("unknown student");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn duplicate_open_request_is_a_conflict(student: Principal) {
    let course = course_with(5, 0);
    let course_id = course.id();
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_create_pending()
        .times(1)
        .return_once(|_| Ok(EnrollmentInsert::Duplicate));

    let svc = service(
        catalogue_returning(course),
        students_returning(student.user_id()),
        enrollments,
    );
    let err = svc
        .request_enrollment(RequestEnrollmentRequest {
            principal: student,
            student_id: student.user_id(),
            course_id,
        })
        .await
        .expect_err("duplicate refused");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn approve_writes_approval_with_admin_and_time(admin: Principal) {
    let pending = pending_for(UserId::random());
    let admin_id = admin.user_id();
    let mut enrollments = enrollments_finding(pending.clone());
    enrollments
        .expect_approve_with_reservation()
        .times(1)
        .withf(move |e| {
            e.status() == EnrollmentStatus::Approved && e.decided_by() == Some(admin_id)
        })
        .return_once(|_| Ok(ApprovalWrite::Approved));

    let svc = service(MockCourseCatalogue::new(), MockStudentRepository::new(), enrollments);
    let approved = svc
        .approve_enrollment(decide(admin, &pending))
        .await
        .expect("approval succeeds");

    assert_eq!(approved.status(), EnrollmentStatus::Approved);
    assert_eq!(approved.decided_by(), Some(admin_id));
    assert_eq!(approved.decided_at(), Some(fixture_now()));
}

#[rstest]
#[tokio::test]
async fn approve_on_full_course_leaves_enrollment_pending(admin: Principal) {
    let pending = pending_for(UserId::random());
    let mut enrollments = enrollments_finding(pending.clone());
    enrollments
        .expect_approve_with_reservation()
        .times(1)
        .return_once(|_| Ok(ApprovalWrite::CourseFull));

    let svc = service(MockCourseCatalogue::new(), MockStudentRepository::new(), enrollments);
    let err = svc
        .approve_enrollment(decide(admin, &pending))
        .await
        .expect_err("course is full");

    assert_eq!(err.code(), ErrorCode::CourseFull);
    assert_eq!(
        err.message(),
        format!("course {} has no free seats", pending.course_id())
    );
    assert_eq!(
        err.details().and_then(|d| d.get("courseId")),
        Some(&serde_json::json!(pending.course_id().to_string()))
    );
}

#[rstest]
#[case(Role::Student)]
#[case(Role::Professor)]
#[tokio::test]
async fn only_administrators_decide(#[case] role: Role) {
    let principal = Principal::new(UserId::random(), role);
    let pending = pending_for(UserId::random());
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments.expect_find_by_id().times(0);
    enrollments.expect_approve_with_reservation().times(0);
    enrollments.expect_decide_if_pending().times(0);

    let svc = service(MockCourseCatalogue::new(), MockStudentRepository::new(), enrollments);
    let approve = svc
        .approve_enrollment(decide(principal, &pending))
        .await
        .expect_err("approval forbidden");
    let reject = svc
        .reject_enrollment(decide(principal, &pending))
        .await
        .expect_err("rejection forbidden");

    assert_eq!(approve.code(), ErrorCode::Forbidden);
    assert_eq!(reject.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn deciding_unknown_enrollment_is_not_found(admin: Principal) {
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let svc = service(MockCourseCatalogue::new(), MockStudentRepository::new(), enrollments);
    let err = svc
        .approve_enrollment(DecideEnrollmentRequest {
            principal: admin,
            enrollment_id: EnrollmentId::random(),
        })
        .await
        .expect_err("missing enrollment");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(EnrollmentDecision::Approve)]
#[case(EnrollmentDecision::Reject)]
#[tokio::test]
async fn re_approving_a_decided_enrollment_never_reaches_storage(
    admin: Principal,
    #[case] first: EnrollmentDecision,
) {
    let decided = pending_for(UserId::random())
        .decide(first, admin.user_id(), fixture_now())
        .expect("first decision");
    let mut enrollments = enrollments_finding(decided.clone());
    enrollments.expect_approve_with_reservation().times(0);

    let svc = service(MockCourseCatalogue::new(), MockStudentRepository::new(), enrollments);
    let err = svc
        .approve_enrollment(decide(admin, &decided))
        .await
        .expect_err("terminal enrollments are final");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("details attached");
    assert_eq!(details["code"], ENROLLMENT_ALREADY_DECIDED);
    assert_eq!(details["status"], first.target_status().as_str());
}

#[rstest]
#[tokio::test]
async fn approval_race_lost_is_reported_as_already_decided(admin: Principal) {
    let pending = pending_for(UserId::random());
    let mut enrollments = enrollments_finding(pending.clone());
    enrollments
        .expect_approve_with_reservation()
        .times(1)
        .return_once(|_| Ok(ApprovalWrite::NotPending));

    let svc = service(MockCourseCatalogue::new(), MockStudentRepository::new(), enrollments);
    let err = svc
        .approve_enrollment(decide(admin, &pending))
        .await
        .expect_err("race lost");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn reject_records_admin_without_touching_seats(admin: Principal) {
    let pending = pending_for(UserId::random());
    let mut enrollments = enrollments_finding(pending.clone());
    enrollments.expect_approve_with_reservation().times(0);
    enrollments
        .expect_decide_if_pending()
        .times(1)
        .withf(|e| e.status() == EnrollmentStatus::Rejected)
        .return_once(|_| Ok(true));

    let svc = service(MockCourseCatalogue::new(), MockStudentRepository::new(), enrollments);
    let rejected = svc
        .reject_enrollment(decide(admin, &pending))
        .await
        .expect("rejection succeeds");

    assert_eq!(rejected.status(), EnrollmentStatus::Rejected);
    assert_eq!(rejected.decided_by(), Some(admin.user_id()));
}

#[rstest]
#[tokio::test]
async fn storage_outage_maps_to_service_unavailable(admin: Principal) {
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Err(EnrollmentRepositoryError::connection("pool exhausted")));

    let svc = service(MockCourseCatalogue::new(), MockStudentRepository::new(), enrollments);
    let err = svc
        .reject_enrollment(DecideEnrollmentRequest {
            principal: admin,
            enrollment_id: EnrollmentId::random(),
        })
        .await
        .expect_err("outage surfaces");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn bulk_approve_continues_past_failures(admin: Principal) {
    let first = pending_for(UserId::random());
    let second = pending_for(UserId::random());
    let missing = EnrollmentId::random();
    let ids = vec![first.id(), missing, second.id()];

    let mut enrollments = MockEnrollmentRepository::new();
    let (first_c, second_c) = (first.clone(), second.clone());
    enrollments
        .expect_find_by_id()
        .times(3)
        .returning(move |id| {
            Ok([&first_c, &second_c]
                .into_iter()
                .find(|e| e.id() == *id)
                .cloned())
        });
    let first_id = first.id();
    enrollments
        .expect_approve_with_reservation()
        .times(2)
        .returning(move |e| {
            Ok(if e.id() == first_id {
                ApprovalWrite::Approved
            } else {
                ApprovalWrite::CourseFull
            })
        });

    let svc = service(MockCourseCatalogue::new(), MockStudentRepository::new(), enrollments);
    let report = svc
        .bulk_approve(BulkApproveRequest {
            principal: admin,
            enrollment_ids: ids.clone(),
        })
        .await
        .expect("batch runs");

    assert_eq!(report.approved, 1);
    let outcomes: Vec<_> = report
        .results
        .iter()
        .map(|item| (item.enrollment_id, item.outcome.clone()))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            (ids[0], BulkApprovalOutcome::Approved),
            (
                ids[1],
                BulkApprovalOutcome::Failed {
                    code: ErrorCode::NotFound,
                    message: format!("enrollment {missing} not found"),
                }
            ),
            (
                ids[2],
                BulkApprovalOutcome::Failed {
                    code: ErrorCode::CourseFull,
                    message: format!("course {} has no free seats", second.course_id()),
                }
            ),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn bulk_approve_rejects_empty_batches(admin: Principal) {
    let svc = service(
        MockCourseCatalogue::new(),
        MockStudentRepository::new(),
        MockEnrollmentRepository::new(),
    );
    let err = svc
        .bulk_approve(BulkApproveRequest {
            principal: admin,
            enrollment_ids: Vec::new(),
        })
        .await
        .expect_err("empty batch");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn bulk_approve_requires_an_administrator(student: Principal) {
    let svc = service(
        MockCourseCatalogue::new(),
        MockStudentRepository::new(),
        MockEnrollmentRepository::new(),
    );
    let err = svc
        .bulk_approve(BulkApproveRequest {
            principal: student,
            enrollment_ids: vec![EnrollmentId::random()],
        })
        .await
        .expect_err("students cannot approve");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn students_see_only_their_own_enrollments(student: Principal) {
    let other = pending_for(UserId::random());
    let svc = service(
        MockCourseCatalogue::new(),
        MockStudentRepository::new(),
        enrollments_finding(other.clone()),
    );

    let err = svc
        .get_enrollment(&student, &other.id())
        .await
        .expect_err("foreign enrollment hidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let err = svc
        .list_student_enrollments(&student, &other.student_id())
        .await
        .expect_err("foreign listing hidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn course_rosters_are_staff_only(student: Principal) {
    let svc = service(
        MockCourseCatalogue::new(),
        MockStudentRepository::new(),
        MockEnrollmentRepository::new(),
    );
    let err = svc
        .list_course_enrollments(&student, &CourseId::random())
        .await
        .expect_err("students cannot see rosters");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn professors_read_course_rosters() {
    let professor = Principal::new(UserId::random(), Role::Professor);
    let course = course_with(2, 0);
    let course_id = course.id();
    let pending = Enrollment::request(UserId::random(), course_id, fixture_now());
    let mut enrollments = MockEnrollmentRepository::new();
    let listed = vec![pending.clone()];
    enrollments
        .expect_list_for_course()
        .times(1)
        .return_once(move |_| Ok(listed));

    let svc = service(catalogue_returning(course), MockStudentRepository::new(), enrollments);
    let roster = svc
        .list_course_enrollments(&professor, &course_id)
        .await
        .expect("roster visible");
    assert_eq!(roster, vec![pending]);
}

#[rstest]
#[tokio::test]
async fn catalogue_query_failures_are_internal() {
    let mut courses = MockCourseCatalogue::new();
    courses
        .expect_list_courses()
        .times(1)
        .return_once(|| Err(CourseCatalogueError::query("bad sql")));

    let svc = service(courses, MockStudentRepository::new(), MockEnrollmentRepository::new());
    let err = svc.list_courses().await.expect_err("query fails");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

fn subject_of(course: &Course, description: &str) -> Subject {
    Subject::new(crate::domain::SubjectId::random(), course.id(), description, 5)
        .expect("valid subject")
}

#[rstest]
#[tokio::test]
async fn course_listing_groups_subjects_by_course() {
    let algebra = course_with(30, 2);
    let chemistry = course_with(2, 0);
    let matrices = subject_of(&algebra, "Matrices");
    let titration = subject_of(&chemistry, "Titration");
    let mut courses = MockCourseCatalogue::new();
    let listed = vec![algebra.clone(), chemistry.clone()];
    courses
        .expect_list_courses()
        .times(1)
        .return_once(move || Ok(listed));
    let all = vec![matrices.clone(), titration.clone()];
    courses
        .expect_list_all_subjects()
        .times(1)
        .return_once(move || Ok(all));

    let svc = service(courses, MockStudentRepository::new(), MockEnrollmentRepository::new());
    let summaries = svc.list_courses().await.expect("courses listed");

    assert_eq!(
        summaries,
        vec![
            CourseSummary {
                course: algebra,
                subjects: vec![matrices],
            },
            CourseSummary {
                course: chemistry,
                subjects: vec![titration],
            },
        ]
    );
}

#[rstest]
#[tokio::test]
async fn subjects_of_unknown_course_are_not_found() {
    let mut courses = MockCourseCatalogue::new();
    courses
        .expect_find_course()
        .times(1)
        .return_once(|_| Ok(None));
    courses.expect_list_subjects().times(0);

    let svc = service(courses, MockStudentRepository::new(), MockEnrollmentRepository::new());
    let err = svc
        .list_course_subjects(&CourseId::random())
        .await
        .expect_err("unknown course");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn profile_exposes_the_soft_hold(admin: Principal) {
    let student_id = UserId::random();
    let course_id = CourseId::random();
    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_id()
        .times(1)
        .return_once(move |id| Ok(Some(Student::new(*id, "North High", Some(course_id)))));

    let svc = service(MockCourseCatalogue::new(), students, MockEnrollmentRepository::new());
    let profile = svc
        .student_profile(&admin, &student_id)
        .await
        .expect("administrators read any profile");
    assert_eq!(profile.current_course(), Some(course_id));
}

#[rstest]
#[tokio::test]
async fn students_cannot_read_other_profiles(student: Principal) {
    let mut students = MockStudentRepository::new();
    students.expect_find_by_id().times(0);
    let svc = service(MockCourseCatalogue::new(), students, MockEnrollmentRepository::new());

    let err = svc
        .student_profile(&student, &UserId::random())
        .await
        .expect_err("foreign profile hidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);

    let err = svc
        .student_courses(&student, &UserId::random())
        .await
        .expect_err("foreign courses hidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(Role::Student, false)]
#[case(Role::Professor, true)]
#[case(Role::Administrator, true)]
#[tokio::test]
async fn student_list_is_staff_only(#[case] role: Role, #[case] allowed: bool) {
    let mut students = MockStudentRepository::new();
    students
        .expect_list_students()
        .times(usize::from(allowed))
        .return_once(|| Ok(vec![Student::new(UserId::random(), "North High", None)]));
    let svc = service(MockCourseCatalogue::new(), students, MockEnrollmentRepository::new());

    let result = svc
        .list_students(&Principal::new(UserId::random(), role))
        .await;
    match (result, allowed) {
        (Ok(listed), true) => assert_eq!(listed.len(), 1),
        (Err(err), false) => assert_eq!(err.code(), ErrorCode::Forbidden),
        (other, _) => panic!("unexpected {other:?} for {role:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn student_courses_lists_the_held_course_with_subjects(student: Principal) {
    let course = course_with(10, 3);
    let course_id = course.id();
    let essay = subject_of(&course, "Essay writing");
    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_id()
        .times(1)
        .return_once(move |id| Ok(Some(Student::new(*id, "North High", Some(course_id)))));
    let mut courses = catalogue_returning(course.clone());
    let subjects = vec![essay.clone()];
    courses
        .expect_list_subjects()
        .withf(move |id| *id == course_id)
        .times(1)
        .return_once(move |_| Ok(subjects));

    let svc = service(courses, students, MockEnrollmentRepository::new());
    let held = svc
        .student_courses(&student, &student.user_id())
        .await
        .expect("own courses visible");
    assert_eq!(
        held,
        vec![CourseSummary {
            course,
            subjects: vec![essay],
        }]
    );
}

#[rstest]
#[tokio::test]
async fn student_without_a_hold_has_no_courses(student: Principal) {
    let mut courses = MockCourseCatalogue::new();
    courses.expect_find_course().times(0);
    let svc = service(
        courses,
        students_returning(student.user_id()),
        MockEnrollmentRepository::new(),
    );
    let held = svc
        .student_courses(&student, &student.user_id())
        .await
        .expect("own courses visible");
    assert!(held.is_empty());
}

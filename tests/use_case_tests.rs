
use buildethiopia_api::{
    entities::{
        admin::AdminUpdateUserRequest,
        comment::{CommentInsert, CommentRequest},
        featured::{FeatureProjectRequest, FeaturedProject, FeaturedQuery},
        profile::{ProfileRole, UpdateProfileRequest},
        project::{NewProjectRequest, UpdateProjectRequest},
    },
    errors::AppError,
    use_cases::{
        admin::AdminHandler,
        comment::CommentHandler,
        profile::ProfileHandler,
        project::ProjectHandler,
        upvote::UpvoteHandler,
    },
};
use chrono::Duration;
use fakes::*;
use mockall::predicate::eq;
use uuid::Uuid;

fn project_handler(
    projects: MockProjectRepo,
    featured: MockFeaturedRepo,
    upvotes: MockUpvoteRepo,
) -> ProjectHandler<MockProjectRepo, MockFeaturedRepo, MockUpvoteRepo> {
    ProjectHandler::new(projects, featured, upvotes, 7)
}

fn owned_by(owner: Uuid) -> MockProjectRepo {
    let mut projects = MockProjectRepo::new();
    projects
        .expect_get_project_owner()
        .returning(move |_| Ok(Some(owner)));
    projects
}

fn missing_project() -> MockProjectRepo {
    let mut projects = MockProjectRepo::new();
    projects.expect_get_project_owner().returning(|_| Ok(None));
    projects
}

fn new_project() -> NewProjectRequest {
    NewProjectRequest {
        title: "  Telebirr Ledger ".to_string(),
        description: "A ledger for mobile money payments".to_string(),
        tech_stack: vec!["Rust".to_string(), "rust".to_string(), "Postgres".to_string()],
        github_url: Some("https://github.com/abebe/ledger".to_string()),
        live_url: None,
        thumbnail_url: None,
        media_urls: Vec::new(),
    }
}

#[actix_rt::test]
async fn developers_publish_projects_with_normalised_tags() {
    let developer = sample_user("abebe", ProfileRole::Developer, false);
    let developer_id = developer.id;

    let mut projects = MockProjectRepo::new();
    projects
        .expect_create_project()
        .withf(move |insert| {
            insert.developer_id == developer_id
                && insert.title == "Telebirr Ledger"
                && insert.tech_stack == vec!["rust".to_string(), "postgres".to_string()]
        })
        .times(1)
        .returning(|insert| Ok(sample_project(Uuid::new_v4(), insert.developer_id)));
    let handler = project_handler(projects, MockFeaturedRepo::new(), MockUpvoteRepo::new());

    let project = handler.create_project(&claims_for(&developer), new_project()).await.unwrap();
    assert_eq!(project.developer_id, developer.id);
}

#[actix_rt::test]
async fn recruiters_cannot_publish_projects() {
    let recruiter = sample_user("hr_team", ProfileRole::Recruiter, false);
    let mut projects = MockProjectRepo::new();
    projects.expect_create_project().never();
    let handler = project_handler(projects, MockFeaturedRepo::new(), MockUpvoteRepo::new());

    let err = handler.create_project(&claims_for(&recruiter), new_project()).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[actix_rt::test]
async fn invalid_project_fields_are_reported() {
    let developer = sample_user("abebe", ProfileRole::Developer, false);
    let handler = project_handler(MockProjectRepo::new(), MockFeaturedRepo::new(), MockUpvoteRepo::new());
    let request = NewProjectRequest {
        title: "ab".to_string(),
        github_url: Some("ftp://example.com".to_string()),
        ..new_project()
    };

    let err = handler.create_project(&claims_for(&developer), request).await.unwrap_err();
    let AppError::ValidationError(fields) = err else {
        panic!("expected a validation error");
    };
    assert!(fields.iter().any(|f| f.field == "title"));
    assert!(fields.iter().any(|f| f.field == "github_url"));
}

#[actix_rt::test]
async fn only_the_owner_updates_a_project() {
    let owner = sample_user("abebe", ProfileRole::Developer, false);
    let stranger = sample_user("selam", ProfileRole::Developer, false);
    let mut projects = owned_by(owner.id);
    projects.expect_update_project().never();
    let handler = project_handler(projects, MockFeaturedRepo::new(), MockUpvoteRepo::new());

    let request = UpdateProjectRequest {
        title: Some("Renamed".to_string()),
        ..UpdateProjectRequest::default()
    };
    let err = handler
        .update_project(&claims_for(&stranger), &Uuid::new_v4(), request)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[actix_rt::test]
async fn empty_project_update_is_rejected() {
    let owner = sample_user("abebe", ProfileRole::Developer, false);
    let handler = project_handler(owned_by(owner.id), MockFeaturedRepo::new(), MockUpvoteRepo::new());

    let err = handler
        .update_project(&claims_for(&owner), &Uuid::new_v4(), UpdateProjectRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[actix_rt::test]
async fn admins_may_delete_any_project() {
    let owner = sample_user("abebe", ProfileRole::Developer, false);
    let admin = sample_user("admin", ProfileRole::Developer, true);
    let project_id = Uuid::new_v4();

    let mut projects = owned_by(owner.id);
    projects
        .expect_delete_project()
        .with(eq(project_id))
        .times(1)
        .returning(|_| Ok(()));
    let handler = project_handler(projects, MockFeaturedRepo::new(), MockUpvoteRepo::new());

    handler.delete_project(&claims_for(&admin), &project_id).await.unwrap();
}

#[actix_rt::test]
async fn strangers_cannot_delete_projects() {
    let owner = sample_user("abebe", ProfileRole::Developer, false);
    let stranger = sample_user("selam", ProfileRole::Developer, false);
    let mut projects = owned_by(owner.id);
    projects.expect_delete_project().never();
    let handler = project_handler(projects, MockFeaturedRepo::new(), MockUpvoteRepo::new());

    let err = handler.delete_project(&claims_for(&stranger), &Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[actix_rt::test]
async fn missing_projects_are_not_found() {
    let owner = sample_user("abebe", ProfileRole::Developer, false);
    let mut projects = missing_project();
    projects.expect_get_project_by_id().returning(|_| Ok(None));
    let handler = project_handler(projects, MockFeaturedRepo::new(), MockUpvoteRepo::new());

    let err = handler.delete_project(&claims_for(&owner), &Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = handler.get_project(&Uuid::new_v4(), None).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_rt::test]
async fn project_detail_renders_markdown_and_viewer_upvote() {
    let owner = Uuid::new_v4();
    let viewer = Uuid::new_v4();
    let project_id = Uuid::new_v4();

    let mut projects = MockProjectRepo::new();
    projects
        .expect_get_project_by_id()
        .returning(move |id| Ok(Some(sample_project(*id, owner))));
    let mut upvotes = MockUpvoteRepo::new();
    upvotes
        .expect_has_upvoted()
        .with(eq(viewer), eq(project_id))
        .returning(|_, _| Ok(true));
    let handler = project_handler(projects, MockFeaturedRepo::new(), upvotes);

    let detail = handler.get_project(&project_id, Some(viewer)).await.unwrap();
    assert!(detail.upvoted);
    assert!(detail.description_html.contains("<strong>ledger</strong>"));

    let anonymous = handler.get_project(&project_id, None).await.unwrap();
    assert!(!anonymous.upvoted);
}

#[actix_rt::test]
async fn featured_limit_is_defaulted_and_clamped() {
    let mut projects = MockProjectRepo::new();
    projects
        .expect_list_featured_projects()
        .with(eq(6))
        .times(1)
        .returning(|_| Ok(Vec::new()));
    projects
        .expect_list_featured_projects()
        .with(eq(50))
        .times(1)
        .returning(|_| Ok(Vec::new()));
    projects
        .expect_list_featured_projects()
        .with(eq(1))
        .times(1)
        .returning(|_| Ok(Vec::new()));
    let handler = project_handler(projects, MockFeaturedRepo::new(), MockUpvoteRepo::new());

    handler.featured_projects(&FeaturedQuery::default()).await.unwrap();
    handler.featured_projects(&FeaturedQuery { limit: Some(500) }).await.unwrap();
    handler.featured_projects(&FeaturedQuery { limit: Some(0) }).await.unwrap();
}

#[actix_rt::test]
async fn featuring_uses_the_default_window() {
    let admin = sample_user("admin", ProfileRole::Developer, true);
    let admin_id = admin.id;
    let owner = Uuid::new_v4();

    let mut projects = MockProjectRepo::new();
    projects
        .expect_get_project_by_id()
        .returning(move |id| Ok(Some(sample_project(*id, owner))));
    let mut featured = MockFeaturedRepo::new();
    featured
        .expect_feature_project()
        .withf(move |_, featured_by, featured_at, expires_at| {
            *featured_by == admin_id && *expires_at - *featured_at == Duration::days(7)
        })
        .times(1)
        .returning(|project_id, featured_by, featured_at, expires_at| {
            Ok(FeaturedProject {
                project_id: *project_id,
                featured_by: Some(*featured_by),
                featured_at,
                expires_at,
            })
        });
    let handler = project_handler(projects, featured, MockUpvoteRepo::new());

    let row = handler
        .feature_project(&claims_for(&admin), &Uuid::new_v4(), FeatureProjectRequest::default())
        .await
        .unwrap();
    assert_eq!(row.featured_by, Some(admin.id));
}

#[actix_rt::test]
async fn featuring_rejects_out_of_range_durations() {
    let admin = sample_user("admin", ProfileRole::Developer, true);
    let mut featured = MockFeaturedRepo::new();
    featured.expect_feature_project().never();
    let handler = project_handler(MockProjectRepo::new(), featured, MockUpvoteRepo::new());

    let request = FeatureProjectRequest { duration_days: Some(365) };
    let err = handler
        .feature_project(&claims_for(&admin), &Uuid::new_v4(), request)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[actix_rt::test]
async fn upvoting_twice_conflicts() {
    let voter = sample_user("selam", ProfileRole::Developer, false);
    let mut upvotes = MockUpvoteRepo::new();
    let mut seq = mockall::Sequence::new();
    upvotes
        .expect_add_upvote()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(Some(1)));
    upvotes
        .expect_add_upvote()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(None));
    let handler = UpvoteHandler::new(upvotes, owned_by(Uuid::new_v4()));
    let project_id = Uuid::new_v4();

    let status = handler.upvote(&claims_for(&voter), &project_id).await.unwrap();
    assert!(status.upvoted);
    assert_eq!(status.upvotes_count, 1);

    let err = handler.upvote(&claims_for(&voter), &project_id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[actix_rt::test]
async fn removing_a_missing_upvote_is_not_found() {
    let voter = sample_user("selam", ProfileRole::Developer, false);
    let mut upvotes = MockUpvoteRepo::new();
    upvotes.expect_remove_upvote().returning(|_, _| Ok(None));
    let handler = UpvoteHandler::new(upvotes, owned_by(Uuid::new_v4()));

    let err = handler.remove_upvote(&claims_for(&voter), &Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_rt::test]
async fn upvotes_on_missing_projects_never_touch_the_counter() {
    let voter = sample_user("selam", ProfileRole::Developer, false);
    let mut upvotes = MockUpvoteRepo::new();
    upvotes.expect_add_upvote().never();
    upvotes.expect_remove_upvote().never();
    let handler = UpvoteHandler::new(upvotes, missing_project());

    let err = handler.upvote(&claims_for(&voter), &Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = handler.remove_upvote(&claims_for(&voter), &Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_rt::test]
async fn anonymous_upvote_status_is_not_upvoted() {
    let mut upvotes = MockUpvoteRepo::new();
    upvotes.expect_upvotes_count().returning(|_| Ok(Some(12)));
    upvotes.expect_has_upvoted().never();
    let handler = UpvoteHandler::new(upvotes, owned_by(Uuid::new_v4()));

    let status = handler.status(&Uuid::new_v4(), None).await.unwrap();
    assert!(!status.upvoted);
    assert_eq!(status.upvotes_count, 12);
}

#[actix_rt::test]
async fn comments_are_sanitised_before_saving() {
    let author = sample_user("selam", ProfileRole::Developer, false);
    let author_id = author.id;
    let project_id = Uuid::new_v4();
    let comment_id = Uuid::new_v4();

    let mut comments = MockCommentRepo::new();
    comments
        .expect_create_comment()
        .with(eq(CommentInsert {
            project_id,
            user_id: author_id,
            content: "Nice work!".to_string(),
        }))
        .times(1)
        .returning(move |_| Ok(comment_id));
    comments
        .expect_get_comment_view()
        .returning(move |id| Ok(Some(sample_comment_view(*id, project_id, author_id, "Nice work!"))));
    let handler = CommentHandler::new(comments, owned_by(Uuid::new_v4()));

    let request = CommentRequest { content: " Nice <script>alert(1)</script>work! ".to_string() };
    let view = handler.create_comment(&claims_for(&author), &project_id, request).await.unwrap();
    assert_eq!(view.id, comment_id);
    assert_eq!(view.content, "Nice work!");
}

#[actix_rt::test]
async fn markup_only_comments_are_rejected() {
    let author = sample_user("selam", ProfileRole::Developer, false);
    let mut comments = MockCommentRepo::new();
    comments.expect_create_comment().never();
    let handler = CommentHandler::new(comments, MockProjectRepo::new());

    let request = CommentRequest { content: "<img src=x onerror=alert(1)>".to_string() };
    let err = handler
        .create_comment(&claims_for(&author), &Uuid::new_v4(), request)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[actix_rt::test]
async fn comments_on_missing_projects_are_not_found() {
    let author = sample_user("selam", ProfileRole::Developer, false);
    let mut comments = MockCommentRepo::new();
    comments.expect_create_comment().never();
    let handler = CommentHandler::new(comments, missing_project());

    let request = CommentRequest { content: "Great".to_string() };
    let err = handler
        .create_comment(&claims_for(&author), &Uuid::new_v4(), request)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_rt::test]
async fn project_owner_may_delete_comments() {
    let owner = sample_user("abebe", ProfileRole::Developer, false);
    let author_id = Uuid::new_v4();
    let project_id = Uuid::new_v4();

    let mut comments = MockCommentRepo::new();
    comments
        .expect_get_comment()
        .returning(move |id| Ok(Some(sample_comment(*id, project_id, author_id))));
    comments.expect_delete_comment().times(1).returning(|_| Ok(()));
    let handler = CommentHandler::new(comments, owned_by(owner.id));

    handler.delete_comment(&claims_for(&owner), &Uuid::new_v4()).await.unwrap();
}

#[actix_rt::test]
async fn strangers_cannot_delete_comments() {
    let stranger = sample_user("selam", ProfileRole::Developer, false);
    let project_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let mut comments = MockCommentRepo::new();
    comments
        .expect_get_comment()
        .returning(move |id| Ok(Some(sample_comment(*id, project_id, author_id))));
    comments.expect_delete_comment().never();
    let handler = CommentHandler::new(comments, owned_by(Uuid::new_v4()));

    let err = handler.delete_comment(&claims_for(&stranger), &Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[actix_rt::test]
async fn only_the_author_edits_a_comment() {
    let owner = sample_user("abebe", ProfileRole::Developer, false);
    let author_id = Uuid::new_v4();
    let project_id = Uuid::new_v4();

    let mut comments = MockCommentRepo::new();
    comments
        .expect_get_comment()
        .returning(move |id| Ok(Some(sample_comment(*id, project_id, author_id))));
    comments.expect_update_comment().never();
    let handler = CommentHandler::new(comments, owned_by(owner.id));

    let request = CommentRequest { content: "Edited".to_string() };
    let err = handler
        .update_comment(&claims_for(&owner), &Uuid::new_v4(), request)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

fn profile_handler(
    profiles: Vec<buildethiopia_api::entities::profile::Profile>,
    users: InMemoryUserRepo,
) -> ProfileHandler<InMemoryProfileRepo, InMemoryUserRepo, MemoryRevocations> {
    profile_handler_with(profiles, users, MemoryRevocations::default())
}

fn profile_handler_with(
    profiles: Vec<buildethiopia_api::entities::profile::Profile>,
    users: InMemoryUserRepo,
    revocations: MemoryRevocations,
) -> ProfileHandler<InMemoryProfileRepo, InMemoryUserRepo, MemoryRevocations> {
    ProfileHandler::new(InMemoryProfileRepo::with_profiles(profiles), users, revocations)
}

#[actix_rt::test]
async fn users_only_update_their_own_profile() {
    let abebe = sample_user("abebe", ProfileRole::Developer, false);
    let selam = sample_user("selam", ProfileRole::Developer, false);
    let handler = profile_handler(
        vec![sample_profile(abebe.id, "abebe")],
        InMemoryUserRepo::with_users(vec![abebe.clone(), selam.clone()]),
    );

    let request = UpdateProfileRequest {
        name: Some("Not Abebe".to_string()),
        ..UpdateProfileRequest::default()
    };
    let err = handler.update_profile(&claims_for(&selam), &abebe.id, request).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[actix_rt::test]
async fn taken_usernames_conflict() {
    let abebe = sample_user("abebe", ProfileRole::Developer, false);
    let selam = sample_user("selam", ProfileRole::Developer, false);
    let handler = profile_handler(
        vec![sample_profile(abebe.id, "abebe")],
        InMemoryUserRepo::with_users(vec![abebe.clone(), selam]),
    );

    let request = UpdateProfileRequest {
        username: Some("selam".to_string()),
        ..UpdateProfileRequest::default()
    };
    let err = handler.update_profile(&claims_for(&abebe), &abebe.id, request).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[actix_rt::test]
async fn keeping_your_own_username_is_allowed() {
    let abebe = sample_user("abebe", ProfileRole::Developer, false);
    let handler = profile_handler(
        vec![sample_profile(abebe.id, "abebe")],
        InMemoryUserRepo::with_users(vec![abebe.clone()]),
    );

    let request = UpdateProfileRequest {
        username: Some("abebe".to_string()),
        skills: Some(vec!["Rust".to_string(), " actix ".to_string()]),
        ..UpdateProfileRequest::default()
    };
    let profile = handler.update_profile(&claims_for(&abebe), &abebe.id, request).await.unwrap();
    assert_eq!(profile.username, "abebe");
    assert_eq!(profile.skills, vec!["rust".to_string(), "actix".to_string()]);
}

#[actix_rt::test]
async fn empty_profile_update_is_rejected() {
    let abebe = sample_user("abebe", ProfileRole::Developer, false);
    let handler = profile_handler(
        vec![sample_profile(abebe.id, "abebe")],
        InMemoryUserRepo::with_users(vec![abebe.clone()]),
    );

    let err = handler
        .update_profile(&claims_for(&abebe), &abebe.id, UpdateProfileRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[actix_rt::test]
async fn account_deletion_is_owner_or_admin() {
    let abebe = sample_user("abebe", ProfileRole::Developer, false);
    let selam = sample_user("selam", ProfileRole::Developer, false);
    let admin = sample_user("admin", ProfileRole::Developer, true);
    let users = InMemoryUserRepo::with_users(vec![abebe.clone(), selam.clone(), admin.clone()]);
    let handler = profile_handler(Vec::new(), users.clone());

    let err = handler.delete_account(&claims_for(&selam), &abebe.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    handler.delete_account(&claims_for(&abebe), &abebe.id).await.unwrap();
    assert_eq!(users.user(&abebe.id).unwrap().deleted_by, Some(abebe.id));

    handler.delete_account(&claims_for(&admin), &selam.id).await.unwrap();
    assert_eq!(users.user(&selam.id).unwrap().deleted_by, Some(admin.id));
}

#[actix_rt::test]
async fn deleting_your_own_account_revokes_the_token_used() {
    let abebe = sample_user("abebe", ProfileRole::Developer, false);
    let selam = sample_user("selam", ProfileRole::Developer, false);
    let admin = sample_user("admin", ProfileRole::Developer, true);
    let revocations = MemoryRevocations::default();
    let handler = profile_handler_with(
        Vec::new(),
        InMemoryUserRepo::with_users(vec![abebe.clone(), selam.clone(), admin.clone()]),
        revocations.clone(),
    );

    let own = claims_for(&abebe);
    handler.delete_account(&own, &abebe.id).await.unwrap();
    assert!(revocations.contains(&own.jti));

    let admin_claims = claims_for(&admin);
    handler.delete_account(&admin_claims, &selam.id).await.unwrap();
    assert!(!revocations.contains(&admin_claims.jti));
}

fn admin_handler(
    users: InMemoryUserRepo,
    profiles: InMemoryProfileRepo,
    accounts: Vec<buildethiopia_api::entities::admin::AccountSummary>,
) -> AdminHandler<StubAdminRepo, InMemoryUserRepo, InMemoryProfileRepo> {
    AdminHandler::new(StubAdminRepo { accounts }, users, profiles)
}

#[actix_rt::test]
async fn admins_cannot_demote_themselves() {
    let admin = sample_user("admin", ProfileRole::Developer, true);
    let users = InMemoryUserRepo::with_users(vec![admin.clone()]);
    let handler = admin_handler(users.clone(), InMemoryProfileRepo::default(), vec![sample_account(&admin)]);

    let request = AdminUpdateUserRequest {
        is_admin: Some(false),
        ..AdminUpdateUserRequest::default()
    };
    let err = handler.update_user(&claims_for(&admin), &admin.id, request).await.unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(users.user(&admin.id).unwrap().is_admin);
}

#[actix_rt::test]
async fn admins_cannot_delete_themselves() {
    let admin = sample_user("admin", ProfileRole::Developer, true);
    let users = InMemoryUserRepo::with_users(vec![admin.clone()]);
    let handler = admin_handler(users.clone(), InMemoryProfileRepo::default(), Vec::new());

    let err = handler.delete_user(&claims_for(&admin), &admin.id).await.unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(users.user(&admin.id).unwrap().deleted_at.is_none());
}

#[actix_rt::test]
async fn admins_promote_and_badge_other_accounts() {
    let admin = sample_user("admin", ProfileRole::Developer, true);
    let abebe = sample_user("abebe", ProfileRole::Developer, false);
    let users = InMemoryUserRepo::with_users(vec![admin.clone(), abebe.clone()]);
    let profiles = InMemoryProfileRepo::with_profiles(vec![sample_profile(abebe.id, "abebe")]);
    let handler = admin_handler(users.clone(), profiles.clone(), vec![sample_account(&abebe)]);

    let request = AdminUpdateUserRequest {
        is_admin: Some(true),
        is_verified: None,
        badges: Some(vec!["Top Contributor".to_string(), "top contributor".to_string()]),
    };
    let account = handler.update_user(&claims_for(&admin), &abebe.id, request).await.unwrap();

    assert_eq!(account.id, abebe.id);
    assert!(users.user(&abebe.id).unwrap().is_admin);
    assert_eq!(profiles.profile(&abebe.id).unwrap().badges, vec!["top contributor".to_string()]);
}

#[actix_rt::test]
async fn admins_soft_delete_other_accounts() {
    let admin = sample_user("admin", ProfileRole::Developer, true);
    let abebe = sample_user("abebe", ProfileRole::Developer, false);
    let users = InMemoryUserRepo::with_users(vec![admin.clone(), abebe.clone()]);
    let handler = admin_handler(users.clone(), InMemoryProfileRepo::default(), Vec::new());

    handler.delete_user(&claims_for(&admin), &abebe.id).await.unwrap();

    let deleted = users.user(&abebe.id).unwrap();
    assert!(deleted.is_deleted());
    assert_eq!(deleted.deleted_by, Some(admin.id));
}

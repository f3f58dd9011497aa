mod common;

use common::{pipeline, MockProvider, RecordingImages, LAYOUTS_JSON, OUTLINE_JSON};
use slidegen_ai::{ProjectActions, DEFAULT_RECENT_LIMIT};
use slidegen_core::{
    ActionResponse, ActionStatus, ContentKind, ContentNode, InMemoryIdentity,
    InMemoryProjectRepository, OutlineCard, ProjectRepository, Slide, SlideGenError, User,
};

fn user(id: &str, subscription: bool) -> User {
    User {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        name: id.to_string(),
        subscription,
    }
}

fn actions_for(
    identity: InMemoryIdentity,
    reply: &str,
) -> ProjectActions<InMemoryIdentity, InMemoryProjectRepository> {
    let pipeline = pipeline(
        MockProvider::replying("primary-model", reply),
        MockProvider::failing("fallback-model", "offline"),
        RecordingImages::failing_for(&[]),
    );
    ProjectActions::new(identity, InMemoryProjectRepository::new(), pipeline)
}

fn cards() -> Vec<OutlineCard> {
    OutlineCard::from_titles(["Mountains", "Cities"])
}

#[tokio::test]
async fn every_action_requires_a_signed_in_user() {
    let actions = actions_for(InMemoryIdentity::new(), OUTLINE_JSON);

    let err = actions.create_project("Deck", &cards()).await.unwrap_err();
    assert!(matches!(err, SlideGenError::Forbidden(_)));
    assert!(matches!(
        actions.list_projects().await,
        Err(SlideGenError::Forbidden(_))
    ));
    assert!(matches!(
        actions.generate_outline_cards("topic").await,
        Err(SlideGenError::Forbidden(_))
    ));
    assert!(actions.repository().is_empty());
}

#[tokio::test]
async fn create_project_stores_card_titles_in_order() {
    let actions = actions_for(InMemoryIdentity::signed_in(user("ana", true)), OUTLINE_JSON);
    let mut shuffled = cards();
    shuffled.reverse();

    let project = actions.create_project("Travel", &shuffled).await.unwrap();

    assert_eq!(project.outlines, vec!["Mountains", "Cities"]);
    assert_eq!(project.user_id, "ana");
    assert!(project.slides.is_none());
    assert_eq!(actions.get_project(&project.id).await.unwrap(), project);
}

#[tokio::test]
async fn create_project_requires_title_and_cards() {
    let actions = actions_for(InMemoryIdentity::signed_in(user("ana", true)), OUTLINE_JSON);

    let response: ActionResponse<_> = actions.create_project("Travel", &[]).await.into();
    assert_eq!(response.status, ActionStatus::BadRequest);
    assert!(matches!(
        actions.create_project("  ", &cards()).await,
        Err(SlideGenError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn projects_are_scoped_to_their_owner() {
    let identity = InMemoryIdentity::signed_in(user("ana", true));
    let actions = actions_for(identity, OUTLINE_JSON);
    let project = actions.create_project("Travel", &cards()).await.unwrap();

    actions.identity().sign_in(user("ben", true));
    assert!(matches!(
        actions.get_project(&project.id).await,
        Err(SlideGenError::NotFound(_))
    ));
    assert!(actions.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn soft_delete_and_recover() {
    let actions = actions_for(InMemoryIdentity::signed_in(user("ana", true)), OUTLINE_JSON);
    let project = actions.create_project("Travel", &cards()).await.unwrap();

    let deleted = actions.delete_project(&project.id).await.unwrap();
    assert!(deleted.is_deleted);
    assert!(actions.list_projects().await.unwrap().is_empty());
    assert_eq!(actions.deleted_projects().await.unwrap().len(), 1);

    let recovered = actions.recover_project(&project.id).await.unwrap();
    assert!(!recovered.is_deleted);
    assert!(recovered.updated_at >= deleted.updated_at);
    assert_eq!(actions.list_projects().await.unwrap().len(), 1);
    assert!(actions.deleted_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn recent_projects_are_limited_and_not_found_when_empty() {
    let actions = actions_for(InMemoryIdentity::signed_in(user("ana", true)), OUTLINE_JSON);
    assert!(matches!(
        actions.recent_projects(DEFAULT_RECENT_LIMIT).await,
        Err(SlideGenError::NotFound(_))
    ));

    for i in 0..7 {
        actions
            .create_project(&format!("Deck {i}"), &cards())
            .await
            .unwrap();
    }
    let recent = actions.recent_projects(DEFAULT_RECENT_LIMIT).await.unwrap();
    assert_eq!(recent.len(), DEFAULT_RECENT_LIMIT);
    assert!(recent
        .windows(2)
        .all(|pair| pair[0].updated_at >= pair[1].updated_at));
}

#[tokio::test]
async fn update_slides_and_theme_persist() {
    let actions = actions_for(InMemoryIdentity::signed_in(user("ana", true)), OUTLINE_JSON);
    let project = actions.create_project("Travel", &cards()).await.unwrap();

    let slides = vec![
        Slide::new("One", "blank-card", ContentNode::column(vec![])).with_order(7),
        Slide::new("Two", "blank-card", ContentNode::column(vec![])).with_order(9),
    ];
    actions.update_slides(&project.id, slides).await.unwrap();
    actions.update_theme(&project.id, "Midnight").await.unwrap();

    let stored = actions
        .repository()
        .find(&project.id, "ana")
        .await
        .unwrap()
        .unwrap();
    let slides = stored.slides.unwrap();
    assert_eq!(slides[0].slide_order, Some(1));
    assert_eq!(slides[1].slide_order, Some(2));
    assert_eq!(stored.theme_name, "Midnight");

    assert!(matches!(
        actions.update_theme(&project.id, "").await,
        Err(SlideGenError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn layout_generation_requires_a_subscription() {
    let actions = actions_for(InMemoryIdentity::signed_in(user("ana", false)), LAYOUTS_JSON);
    let project = actions.create_project("Travel", &cards()).await.unwrap();

    let err = actions
        .generate_layouts_for_project(&project.id, "Ocean")
        .await
        .unwrap_err();
    assert_eq!(err.status(), ActionStatus::Forbidden);
}

#[tokio::test]
async fn layout_generation_skips_deleted_projects() {
    let actions = actions_for(InMemoryIdentity::signed_in(user("ana", true)), LAYOUTS_JSON);
    let project = actions.create_project("Travel", &cards()).await.unwrap();
    actions.delete_project(&project.id).await.unwrap();

    assert!(matches!(
        actions.generate_layouts_for_project(&project.id, "Ocean").await,
        Err(SlideGenError::NotFound(_))
    ));
    assert!(matches!(
        actions.generate_layouts_for_project("", "Ocean").await,
        Err(SlideGenError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn layout_generation_saves_slides_and_theme() {
    let actions = actions_for(InMemoryIdentity::signed_in(user("ana", true)), LAYOUTS_JSON);
    let project = actions.create_project("Travel", &cards()).await.unwrap();

    let updated = actions
        .generate_layouts_for_project(&project.id, "Ocean")
        .await
        .unwrap();

    assert_eq!(updated.theme_name, "Ocean");
    let slides = updated.slides.unwrap();
    assert_eq!(slides.len(), 2);
    for slide in &slides {
        for image in slide.content.collect_kind(&ContentKind::Image) {
            assert!(image.text().unwrap().starts_with("https://images.test/"));
        }
    }
}

#[tokio::test]
async fn outline_cards_are_numbered_from_one() {
    let actions = actions_for(InMemoryIdentity::signed_in(user("ana", false)), OUTLINE_JSON);

    let outcome = actions.generate_outline_cards("Rust").await.unwrap();

    assert_eq!(outcome.model_used, "primary-model");
    let orders: Vec<u32> = outcome.cards.iter().map(|c| c.order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(outcome.cards[0].title, "a");
}

use mockito::Matcher;
use portfolio_gen::error::PortfolioError;
use portfolio_gen::{AddOptions, Pipeline};
use pretty_assertions::assert_eq;
use std::fs;

mod common;
use common::test_helpers::*;

fn options(dry_run: bool, no_push: bool) -> AddOptions {
    AddOptions {
        repo_url: "https://github.com/octo/job-tracker.git".into(),
        dry_run,
        no_push,
        interactive: false,
        ..AddOptions::default()
    }
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    setup_test_logger();
    let site = create_test_site();
    let mut server = setup_test_server().await;
    let _mocks = mock_repository(&mut server).await;
    let vcs = RecordingVcs::default();

    let before = snapshot_tree(site.path());
    let pipeline = Pipeline::with_version_control(create_test_config(site.path(), &server), vcs.clone()).unwrap();
    let outcome = pipeline.add(options(true, false)).await.unwrap();

    assert!(!outcome.written);
    assert_eq!(outcome.filename, "day-5-job-tracker.html");
    assert!(outcome.page_html.contains("Job Tracker"));
    assert_eq!(snapshot_tree(site.path()), before);
    assert!(vcs.calls().is_empty());
}

#[tokio::test]
async fn test_add_without_publishing() {
    setup_test_logger();
    let site = create_test_site();
    let mut server = setup_test_server().await;
    let _mocks = mock_repository(&mut server).await;
    let vcs = RecordingVcs::default();

    let pipeline = Pipeline::with_version_control(create_test_config(site.path(), &server), vcs.clone()).unwrap();
    let outcome = pipeline.add(options(false, true)).await.unwrap();

    let record = &outcome.record;
    assert_eq!(record.number_label, "Project 5");
    assert_eq!(record.title, "Job Tracker");
    assert_eq!(record.tagline, "Track job applications without spreadsheets");
    assert_eq!(
        record.tech_stack.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
        vec!["JavaScript", "CSS3", "HTML5", "React"]
    );
    assert_eq!(record.features.len(), 2);
    assert_eq!(record.install_steps[0].command, "npm install\nnpm run dev");

    let page_path = site.path().join("projects/day-5-job-tracker.html");
    assert_eq!(outcome.page_path, page_path);
    let page = fs::read_to_string(&page_path).unwrap();
    assert!(page.contains("<h1 class=\"project-title\">Job Tracker</h1>"));

    let gallery = fs::read_to_string(site.path().join("projects.html")).unwrap();
    let existing = gallery.find("existing").unwrap();
    let inserted = gallery.find("data-project=\"job-tracker\"").unwrap();
    let grid_end = gallery.find("</div>\n        <!-- End Projects Grid -->").unwrap();
    assert!(existing < inserted && inserted < grid_end);
    assert!(gallery.ends_with("        <!-- End Projects Grid -->\n    </section>\n</body>\n</html>\n"));

    assert!(outcome.pushed_branch.is_none());
    assert!(vcs.calls().is_empty());
}

#[tokio::test]
async fn test_publish_falls_back_to_secondary_branch() {
    setup_test_logger();
    let site = create_test_site();
    let mut server = setup_test_server().await;
    let _mocks = mock_repository(&mut server).await;
    let vcs = RecordingVcs::rejecting(&["main"]);

    let pipeline = Pipeline::with_version_control(create_test_config(site.path(), &server), vcs.clone()).unwrap();
    let outcome = pipeline.add(options(false, false)).await.unwrap();

    assert_eq!(outcome.pushed_branch.as_deref(), Some("master"));
    assert_eq!(
        vcs.calls(),
        vec![
            "add projects/day-5-job-tracker.html",
            "add projects.html",
            "commit Add project: Job Tracker",
            "push origin main",
            "push origin master",
        ]
    );
}

#[tokio::test]
async fn test_push_failure_keeps_files() {
    let site = create_test_site();
    let mut server = setup_test_server().await;
    let _mocks = mock_repository(&mut server).await;
    let vcs = RecordingVcs::rejecting(&["main", "master"]);

    let pipeline = Pipeline::with_version_control(create_test_config(site.path(), &server), vcs).unwrap();
    let result = pipeline.add(options(false, false)).await;

    assert!(matches!(result, Err(PortfolioError::Publish(_))));
    assert!(site.path().join("projects/day-5-job-tracker.html").exists());
}

#[tokio::test]
async fn test_missing_anchor_aborts_without_writes() {
    let site = create_test_site();
    fs::write(site.path().join("projects.html"), "<html><body><div></div></body></html>\n").unwrap();
    let mut server = setup_test_server().await;
    let _mocks = mock_repository(&mut server).await;

    let before = snapshot_tree(site.path());
    let pipeline = Pipeline::with_version_control(create_test_config(site.path(), &server), RecordingVcs::default()).unwrap();
    let result = pipeline.add(options(false, false)).await;

    assert!(matches!(result, Err(PortfolioError::AnchorNotFound(_))));
    assert_eq!(snapshot_tree(site.path()), before);
}

#[tokio::test]
async fn test_failed_page_write_restores_gallery() {
    let site = create_test_site();
    fs::remove_dir_all(site.path().join("projects")).unwrap();
    fs::write(site.path().join("projects"), "not a directory").unwrap();
    let mut server = setup_test_server().await;
    let _mocks = mock_repository(&mut server).await;
    let vcs = RecordingVcs::default();

    let before = snapshot_tree(site.path());
    let pipeline = Pipeline::with_version_control(create_test_config(site.path(), &server), vcs.clone()).unwrap();
    let result = pipeline.add(options(false, false)).await;

    assert!(matches!(result, Err(PortfolioError::IO(_))));
    assert_eq!(snapshot_tree(site.path()), before);
    assert!(vcs.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_reference_fails_before_network() {
    let site = create_test_site();
    let mut server = setup_test_server().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let pipeline = Pipeline::with_version_control(create_test_config(site.path(), &server), RecordingVcs::default()).unwrap();
    let result = pipeline
        .add(AddOptions {
            repo_url: "definitely not a repository".into(),
            ..AddOptions::default()
        })
        .await;

    assert!(matches!(result, Err(PortfolioError::InvalidReference(_))));
    any.assert_async().await;
}

#[tokio::test]
async fn test_unknown_repository_is_fatal() {
    let site = create_test_site();
    let mut server = setup_test_server().await;
    let _m = server
        .mock("GET", "/repos/octo/job-tracker")
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;

    let before = snapshot_tree(site.path());
    let pipeline = Pipeline::with_version_control(create_test_config(site.path(), &server), RecordingVcs::default()).unwrap();
    let result = pipeline.add(options(false, true)).await;

    assert!(matches!(result, Err(PortfolioError::RepositoryNotFound(_))));
    assert_eq!(snapshot_tree(site.path()), before);
}

#[tokio::test]
async fn test_overrides() {
    let site = create_test_site();
    let mut server = setup_test_server().await;
    let _mocks = mock_repository(&mut server).await;

    let pipeline = Pipeline::with_version_control(create_test_config(site.path(), &server), RecordingVcs::default()).unwrap();
    let outcome = pipeline
        .add(AddOptions {
            number: Some("Day 42".into()),
            title: Some("Offer Board".into()),
            tagline: Some("Never lose an offer again".into()),
            demo_url: Some("https://youtu.be/demo".into()),
            ..options(true, true)
        })
        .await
        .unwrap();

    assert_eq!(outcome.filename, "day-42-offer-board.html");
    assert_eq!(outcome.record.tagline, "Never lose an offer again");
    assert!(outcome.card_html.contains("https://youtu.be/demo"));
    assert!(!outcome.card_html.contains(">Post</a>"));
}

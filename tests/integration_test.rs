use std::path::PathBuf;
use std::time::Duration;

use article_publish::models::load_markdown_article;
use article_publish::services::LoginMonitor;
use article_publish::utils::logging;
use article_publish::{
    JsExecutor, PublishEngine, Session, SiteConfig, SubmitMode, UserConfig,
};

/// 写入一份最小可用的站点配置，返回文件路径
async fn write_demo_site(dir: &std::path::Path) -> PathBuf {
    let path = dir.join("site.jsonc");
    tokio::fs::write(
        &path,
        r#"
        {
            // 演示站点：掘金风格的编辑器入口
            "name": "demo",
            "start_url": "https://example.com/editor",
            "auth": { "type": "marker_absent", "selector": ".login-button" },
            "selectors": {
                "title": ["input.title-input"],
                "body": [".CodeMirror", ".editor-content"],
                "tags": ["input.tag-input"],
                "publish": ["button.publish-btn"],
                "draft": ["button.draft-btn"]
            },
            "editor_probes": [
                {
                    "name": "codemirror",
                    "detect": "document.querySelector('.CodeMirror') && document.querySelector('.CodeMirror').CodeMirror",
                    "set_content": "document.querySelector('.CodeMirror').CodeMirror.setValue($CONTENT)"
                }
            ],
            "category_names": { "后端开发": "后端" },
            "publish_shortcut": { "key": "Enter", "ctrl_or_cmd": true }
        }
        "#,
    )
    .await
    .unwrap();
    path
}

#[tokio::test]
async fn test_site_config_and_article_wiring() {
    let dir = tempfile::tempdir().unwrap();

    let site_path = write_demo_site(dir.path()).await;
    let site = SiteConfig::from_file(&site_path).await.unwrap();
    assert_eq!(site.name, "demo");
    assert_eq!(site.editor_probes.len(), 1);
    assert_eq!(site.normalize_category("后端开发"), "后端");

    let article_path = dir.path().join("article.md");
    tokio::fs::write(
        &article_path,
        "+++\ntitle = \"Hello\"\ntags = []\n+++\nWorld",
    )
    .await
    .unwrap();
    let draft = load_markdown_article(&article_path).await.unwrap();
    assert_eq!(draft.title, "Hello");
    assert_eq!(draft.content, "World");
    assert!(draft.tags.is_empty());
}

#[tokio::test]
#[ignore] // 需要本机有可用的 Chrome/Chromium，手动运行：cargo test -- --ignored
async fn test_session_open_and_close() {
    logging::init();

    let dir = tempfile::tempdir().unwrap();
    let (mut session, page) = Session::open(dir.path(), "https://example.com")
        .await
        .expect("启动浏览器失败");

    let executor = JsExecutor::new(page);
    let url = executor.current_url().await.expect("读取 URL 失败");
    assert!(url.contains("example.com"));

    // close 幂等
    session.close().await.unwrap();
    session.close().await.unwrap();
}

#[tokio::test]
#[ignore] // 需要浏览器和真实站点页面
async fn test_login_monitor_against_live_page() {
    logging::init();

    let dir = tempfile::tempdir().unwrap();
    let (mut session, page) = Session::open(dir.path(), "https://example.com")
        .await
        .expect("启动浏览器失败");
    let executor = JsExecutor::new(page);

    // example.com 恒有 h1，谓词应立即为真
    let monitor = LoginMonitor::default();
    let predicate = article_publish::AuthPredicate::MarkerPresent {
        selector: "h1".to_string(),
    };
    monitor
        .await_authenticated(&executor, &predicate, Duration::from_secs(10))
        .await
        .expect("登录判定应当立即通过");

    session.close().await.unwrap();
}

#[tokio::test]
#[ignore] // 完整发布流程：需要浏览器、已配置的真实站点和人工登录
async fn test_publish_draft_end_to_end() {
    logging::init();

    let dir = tempfile::tempdir().unwrap();
    let site_path = write_demo_site(dir.path()).await;
    // 注意：请把 site.jsonc 换成真实站点的配置再运行
    let site = SiteConfig::from_file(&site_path).await.unwrap();

    let article_path = dir.path().join("article.md");
    tokio::fs::write(
        &article_path,
        "+++\ntitle = \"集成测试草稿\"\ntags = [\"rust\"]\n+++\n这是一篇由集成测试保存的草稿。",
    )
    .await
    .unwrap();
    let draft = load_markdown_article(&article_path).await.unwrap();

    let config = UserConfig {
        profile_dir: dir.path().join("profile"),
        ..UserConfig::default()
    };

    let mut engine = PublishEngine::initialize(config, site)
        .await
        .expect("引擎初始化失败");
    let result = engine
        .publish(&draft, SubmitMode::Draft)
        .await
        .expect("发布流程失败");
    engine.close().await.unwrap();

    println!("提交状态: {}，URL: {:?}", result.status, result.url);
    assert_eq!(result.status.exit_code(), 0, "草稿保存应当成功");
}

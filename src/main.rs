use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::error;

use article_publish::models::load_markdown_article;
use article_publish::utils::logging;
use article_publish::{ArticleDraft, PublishEngine, SiteConfig, SubmitMode, UserConfig};

#[tokio::main]
async fn main() {
    // 初始化日志
    logging::init();

    let code = run().await;
    std::process::exit(code);
}

/// 命令行包装层：解析参数、调用引擎、打印状态行并映射退出码
async fn run() -> i32 {
    let mut args = std::env::args().skip(1);
    let (article_path, site_path, mode_arg) = match (args.next(), args.next()) {
        (Some(article), Some(site)) => (PathBuf::from(article), PathBuf::from(site), args.next()),
        _ => {
            eprintln!("用法: article_publish <文章.md> <站点配置.json> [draft|publish]");
            return 2;
        }
    };

    // 加载用户配置（固定位置，缺失时用默认值）
    let config = UserConfig::load_or_default();

    // 模式：命令行参数优先，否则由 auto_publish 决定
    let mode = match mode_arg.as_deref() {
        Some(arg) => match SubmitMode::parse(arg) {
            Some(mode) => mode,
            None => {
                eprintln!("未知模式 '{}'，只接受 draft 或 publish", arg);
                return 2;
            }
        },
        None => {
            if config.auto_publish {
                SubmitMode::Publish
            } else {
                SubmitMode::Draft
            }
        }
    };

    let (site, draft) = match load_inputs(&site_path, &article_path).await {
        Ok(inputs) => inputs,
        Err(e) => {
            error!("❌ {:#}", e);
            return 1;
        }
    };

    let mut engine = match PublishEngine::initialize(config, site).await {
        Ok(engine) => engine,
        Err(e) => {
            error!("❌ {}", e);
            return 1;
        }
    };

    let outcome = engine.publish(&draft, mode).await;
    let _ = engine.close().await;

    match outcome {
        Ok(result) => {
            logging::log_result(&result);
            result.status.exit_code()
        }
        Err(e) => {
            error!("❌ 发布失败: {}", e);
            1
        }
    }
}

/// 输入加载阶段：给底层错误补上「哪个文件」的上下文
async fn load_inputs(
    site_path: &Path,
    article_path: &Path,
) -> anyhow::Result<(SiteConfig, ArticleDraft)> {
    let site = SiteConfig::from_file(site_path)
        .await
        .with_context(|| format!("站点配置加载失败: {}", site_path.display()))?;
    let draft = load_markdown_article(article_path)
        .await
        .with_context(|| format!("文章加载失败: {}", article_path.display()))?;
    Ok((site, draft))
}

//! Block Render 命令行 - 渲染主题外壳 + 页面，输出 JSON 渲染树

use block_render::parser::ApiEnvelope;
use block_render::{DataMap, Error, HandlerTable, PageData, RenderOptions, ThemeData, ThemeShell};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "block-render", version, about = "Render a theme shell and page schema to a JSON tree")]
struct Cli {
    /// theme.json（可带 `{success, data}` 外壳）
    #[arg(long)]
    theme: PathBuf,

    /// 页面 JSON（可带 `{success, data}` 外壳）
    #[arg(long)]
    page: PathBuf,

    /// 全局数据作用域（cart_count、products 等）
    #[arg(long)]
    data: Option<PathBuf>,

    /// engine.json 渲染配置
    #[arg(long)]
    config: Option<PathBuf>,

    /// 视口宽度，用于解析轮播断点
    #[arg(long)]
    viewport: Option<u32>,

    /// 以暗色模式渲染
    #[arg(long)]
    dark: bool,

    /// 格式化输出
    #[arg(long)]
    pretty: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        tracing::error!("{}", err);
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let mut options = match &cli.config {
        Some(path) => serde_json::from_value::<RenderOptions>(read_json(path)?)?,
        None => RenderOptions::default(),
    };
    if let Some(width) = cli.viewport {
        options = options.with_viewport(width);
    }

    let theme: ThemeData = load_document(&cli.theme)?;
    let page: PageData = load_document(&cli.page)?;
    let data = match &cli.data {
        Some(path) => match read_json(path)? {
            JsonValue::Object(map) => map,
            _ => DataMap::new(),
        },
        None => DataMap::new(),
    };

    tracing::info!(theme = %theme.id, template = %page.template, sections = page.sections.len(), "rendering");

    let host = HandlerTable::new().on(block_render::Action::Navigate, |call| {
        tracing::info!(call = ?call, "navigate");
    });
    let mut shell = ThemeShell::new(theme, options, Arc::new(host)).with_dark_mode(cli.dark);
    shell.register_page(&page);

    let tree = shell.render(&page, &data)?;
    let output = if cli.pretty {
        serde_json::to_string_pretty(&tree)?
    } else {
        serde_json::to_string(&tree)?
    };
    println!("{}", output);
    Ok(())
}

fn read_json(path: &Path) -> Result<JsonValue, Error> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// 接受裸文档或内容服务的 `{success, data}` 外壳
fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let value = read_json(path)?;
    let is_envelope = value.get("success").is_some() && value.get("data").is_some();
    if is_envelope {
        let envelope: ApiEnvelope<T> = serde_json::from_value(value)?;
        if let Some(document) = envelope.into_data() {
            return Ok(document);
        }
        tracing::warn!(path = %path.display(), "content service reported failure, using empty document");
        return Ok(serde_json::from_value(JsonValue::Object(DataMap::new()))?);
    }
    Ok(serde_json::from_value(value)?)
}

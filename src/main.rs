//! WomenVoice - 随机御姐语音插件
//!
//! 在控制台宿主中运行插件：每行输入为一条文本消息，发送「撒个娇」获取语音

use std::sync::Arc;

use womenvoice::application::{PluginPort, VoiceFetcher, WomenVoicePlugin};
use womenvoice::config::{load_config, print_config};
use womenvoice::infrastructure::adapters::{HttpVoiceSource, HttpVoiceSourceConfig, ScopedTempDir};
use womenvoice::infrastructure::host::{spawn_stdin_reader, ConsoleChannel, PluginHost};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值），结果在日志初始化后输出
    let loaded = load_config();
    let config = &loaded.config;

    // 初始化日志
    let log_filter = format!("{},womenvoice={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("WomenVoice - 随机御姐语音插件");
    print_config(&loaded);

    // 创建语音来源与临时目录
    let source_config = HttpVoiceSourceConfig::new(config.api.url.clone())
        .with_timeout(config.fetch.timeout_secs);
    let source = Arc::new(HttpVoiceSource::new(source_config)?);
    let temp_dir = Arc::new(ScopedTempDir::new(&config.storage.temp_dir));

    let fetcher = Arc::new(VoiceFetcher::new(source, temp_dir, config.fetch.policy()));
    let plugin: Arc<dyn PluginPort> = Arc::new(WomenVoicePlugin::new(fetcher));

    let mut host = PluginHost::new();
    host.register(plugin);
    let host = Arc::new(host);

    let channel = ConsoleChannel::new(host.clone());
    let lines = spawn_stdin_reader();
    let stdout = tokio::io::stdout();

    tracing::info!("Console channel ready, type '撒个娇' or '#help'");

    // 关闭信号只在消息之间生效，处理中的获取不会被丢弃
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    };
    channel.run(lines, stdout, shutdown).await?;

    // 卸载插件，删除临时文件
    host.shutdown().await;

    tracing::info!("Shutdown complete");

    Ok(())
}

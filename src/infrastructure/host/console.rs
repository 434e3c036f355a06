//! Console Channel - 标准输入/输出聊天通道
//!
//! 标准输入在独立线程上阻塞读取，按行送入 channel；
//! 关闭信号只在两条消息之间检查，正在处理的消息总会完成

use std::future::Future;
use std::io::BufRead;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use super::PluginHost;
use crate::domain::message::{ChatContext, Reply, ReplyKind};

/// 输出帮助文本的指令
pub const HELP_COMMAND: &str = "#help";

/// 读取线程与通道之间的缓冲行数
const LINE_BUFFER: usize = 16;

/// 在独立线程上读取标准输入
///
/// 进程退出时不等待该线程，阻塞中的读取不会拖住关闭流程
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(LINE_BUFFER);

    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    tracing::error!(error = %err, "Failed to read stdin");
                    break;
                }
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    rx
}

/// 控制台通道
///
/// 每行输入视为一条文本消息
pub struct ConsoleChannel {
    host: Arc<PluginHost>,
}

impl ConsoleChannel {
    pub fn new(host: Arc<PluginHost>) -> Self {
        Self { host }
    }

    /// 处理输入直到输入结束或收到关闭信号
    pub async fn run<W, S>(
        &self,
        mut lines: mpsc::Receiver<String>,
        mut writer: W,
        shutdown: S,
    ) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let line = tokio::select! {
                line = lines.recv() => match line {
                    Some(line) => line,
                    None => {
                        tracing::info!("Input closed");
                        break;
                    }
                },
                _ = &mut shutdown => {
                    tracing::info!("Received shutdown signal");
                    break;
                }
            };

            let content = line.trim();
            if content.is_empty() {
                continue;
            }

            let output = if content == HELP_COMMAND {
                self.host.help_text()
            } else {
                let event = self.host.dispatch(ChatContext::text(line.clone())).await;
                match event.reply {
                    Some(reply) => format_reply(&reply),
                    None => {
                        tracing::debug!(content = %content, "No plugin handled message");
                        continue;
                    }
                }
            };

            writer.write_all(output.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }
}

fn format_reply(reply: &Reply) -> String {
    match reply.kind {
        ReplyKind::Text => format!("[text] {}", reply.content),
        ReplyKind::Voice => format!("[voice] {}", reply.content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{PluginMetadata, PluginPort};
    use crate::domain::message::EventContext;
    use async_trait::async_trait;
    use std::time::Duration;

    struct PingPlugin;

    const PING: PluginMetadata = PluginMetadata {
        name: "Ping",
        desire_priority: 0,
        description: "ping",
        version: "0.1",
        author: "test",
    };

    #[async_trait]
    impl PluginPort for PingPlugin {
        fn metadata(&self) -> &PluginMetadata {
            &PING
        }

        async fn on_handle_context(&self, event: &mut EventContext) {
            if event.context.content == "ping" {
                event.reply_and_break(Reply::text("pong"));
            }
        }

        fn help_text(&self) -> String {
            "send ping".to_string()
        }
    }

    /// 处理较慢的插件
    struct SlowPlugin;

    const SLOW: PluginMetadata = PluginMetadata {
        name: "Slow",
        desire_priority: 0,
        description: "slow",
        version: "0.1",
        author: "test",
    };

    #[async_trait]
    impl PluginPort for SlowPlugin {
        fn metadata(&self) -> &PluginMetadata {
            &SLOW
        }

        async fn on_handle_context(&self, event: &mut EventContext) {
            tokio::time::sleep(Duration::from_millis(100)).await;
            event.reply_and_break(Reply::voice("/tmp/slow.mp3"));
        }

        fn help_text(&self) -> String {
            String::new()
        }
    }

    fn channel_with(plugin: Arc<dyn PluginPort>) -> ConsoleChannel {
        let mut host = PluginHost::new();
        host.register(plugin);
        ConsoleChannel::new(Arc::new(host))
    }

    #[tokio::test]
    async fn test_console_round_trip() {
        let channel = channel_with(Arc::new(PingPlugin));

        let (tx, rx) = mpsc::channel(8);
        for line in ["ping", "", "hello", "#help"] {
            tx.send(line.to_string()).await.unwrap();
        }
        drop(tx);

        let mut output = Vec::new();
        channel
            .run(rx, &mut output, std::future::pending())
            .await
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "[text] pong\nsend ping\n");
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_message_in_progress() {
        let channel = channel_with(Arc::new(SlowPlugin));

        let (tx, rx) = mpsc::channel(8);
        tx.send("撒个娇".to_string()).await.unwrap();

        let mut output = Vec::new();
        channel
            .run(rx, &mut output, tokio::time::sleep(Duration::from_millis(20)))
            .await
            .unwrap();

        // 发送端仍然存活，是关闭信号结束了循环
        drop(tx);
        assert_eq!(String::from_utf8(output).unwrap(), "[voice] /tmp/slow.mp3\n");
    }

    #[tokio::test]
    async fn test_shutdown_stops_idle_channel() {
        let channel = channel_with(Arc::new(PingPlugin));

        let (_tx, rx) = mpsc::channel::<String>(8);
        let mut output = Vec::new();
        channel
            .run(rx, &mut output, std::future::ready(()))
            .await
            .unwrap();

        assert!(output.is_empty());
    }
}

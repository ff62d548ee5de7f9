//! Billa - 会话式日程助理
//!
//! 入口：初始化日志、加载配置、构建 Agent 组件，然后以简单的行式 REPL
//! 驱动 handle_chat_turn（用户键取第一个命令行参数，缺省 "demo"）。

use std::io::{BufRead, Write};

use anyhow::Context;
use billa::agent::{create_agent_components, handle_chat_turn, TurnStatus};
use billa::config::load_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    billa::observability::init();

    let cfg = load_config(None).context("Failed to load config")?;
    let components = create_agent_components(&cfg);

    let user_key = std::env::args().nth(1).unwrap_or_else(|| "demo".to_string());
    println!(
        "{} ready. Chatting as '{}'. Ctrl-D to quit.",
        cfg.app.name.as_deref().unwrap_or("billa"),
        user_key
    );

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = handle_chat_turn(&components, &user_key, line).await;
        match response.status {
            TurnStatus::Success => {
                let text = response.data["text"].as_str().unwrap_or_default();
                println!("{}", text);
            }
            TurnStatus::Error => {
                println!(
                    "[{}] {}",
                    response.data["error_kind"].as_str().unwrap_or("error"),
                    response.data["message"].as_str().unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

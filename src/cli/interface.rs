use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::Result;
use colored::*;
use dialoguer::Confirm;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

use crate::agents::ChatAssistant;
use crate::analyzer::analyze_page;
use crate::cli::command::{AuditTarget, Command};
use crate::cli::report::{render_depth, render_health, render_reply};
use crate::config::AppConfig;
use crate::llm::GeminiClient;
use crate::tools::base::ScrollEvents;
use crate::tools::chrome::ChromePage;
use crate::tools::page::{HtmlPage, ScrollMetrics};
use crate::tracker::{track_scroll_depth, ScrollDepthGuard};
use crate::types::message::Transcript;

const HELP: &str = "\
  /audit <url|file>   audit a live page (http/https) or a local HTML file
  /scroll <pixels>    scroll the live page and update scroll depth
  /depth              show the deepest scroll position reached
  /help               show this help
  /quit               exit
  anything else       ask the assistant";

/// 当前页面的滚动深度显示，相当于网页浮层中的 Scroll Depth
struct DepthMonitor {
    events: ScrollEvents,
    tracker: Option<ScrollDepthGuard>,
    depth: Arc<AtomicU32>,
}

impl DepthMonitor {
    fn new() -> Self {
        Self {
            events: ScrollEvents::new(),
            tracker: None,
            depth: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Registers a fresh tracker. Depth restarts from 0.
    fn start(&mut self) {
        self.stop();
        let depth = Arc::clone(&self.depth);
        self.tracker = Some(track_scroll_depth(&self.events, move |value| {
            depth.fetch_max(value, Ordering::SeqCst);
        }));
    }

    fn stop(&mut self) {
        if let Some(tracker) = self.tracker.take() {
            tracker.cancel();
        }
        self.depth.store(0, Ordering::SeqCst);
    }

    fn notify(&self, metrics: ScrollMetrics) {
        self.events.notify(metrics);
    }

    fn current(&self) -> u32 {
        self.depth.load(Ordering::SeqCst)
    }
}

/// Interrupt and EOF end the session normally.
fn next_line(result: Result<String, ReadlineError>) -> Result<Option<String>> {
    match result {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub struct CliInterface {
    config: AppConfig,
    assistant: Option<ChatAssistant>,
    transcript: Transcript,
    editor: DefaultEditor,
    depth: DepthMonitor,
    browser: Option<ChromePage>,
}

impl CliInterface {
    pub fn new(config: AppConfig) -> Result<Self> {
        let assistant = match GeminiClient::new_with_config(config.llm.clone()) {
            Ok(client) => Some(
                ChatAssistant::new(Arc::new(client)).with_search_grounding(config.llm.search_grounding),
            ),
            Err(e) => {
                warn!("chat disabled: {:#}", e);
                None
            }
        };
        let transcript = match &assistant {
            Some(assistant) => assistant.start_transcript(),
            None => Transcript::new(),
        };
        let editor = DefaultEditor::new()?;

        Ok(Self {
            config,
            assistant,
            transcript,
            editor,
            depth: DepthMonitor::new(),
            browser: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("{}", "Page Audit".bright_cyan().bold());
        match self.transcript.last() {
            Some(greeting) => println!("{}", render_reply(greeting)),
            None => println!(
                "{}",
                format!("Chat is disabled: set {} to enable the assistant.", self.config.llm.api_key_env)
                    .yellow()
            ),
        }
        println!("{}", "Type /help for commands.".dimmed());
        println!();

        // 读取出错也要先关闭浏览器会话再返回
        let outcome = self.repl().await;
        self.shutdown().await;
        println!("{}", "Goodbye!".bright_green());
        outcome
    }

    async fn repl(&mut self) -> Result<()> {
        loop {
            let Some(line) = next_line(self.editor.readline("> "))? else {
                return Ok(());
            };
            if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                warn!("failed to record history: {}", e);
            }

            let command = Command::parse(&line);
            if command == Command::Quit {
                return Ok(());
            }
            if let Err(e) = self.handle(command).await {
                println!("{} {:#}", "Error:".bright_red(), e);
            }
            println!();
        }
    }

    async fn handle(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Audit(AuditTarget::Url(url)) => self.audit_live(url.as_str()).await?,
            Command::Audit(AuditTarget::File(path)) => self.audit_file(&path).await?,
            Command::Scroll(pixels) => self.scroll(pixels).await?,
            Command::Depth => println!("{}", render_depth(self.depth.current())),
            Command::Help => println!("{}", HELP),
            Command::Chat(text) => self.chat(&text).await,
            Command::Invalid(message) => println!("{}", message.yellow()),
            Command::Empty | Command::Quit => {}
        }
        Ok(())
    }

    async fn audit_file(&mut self, path: &str) -> Result<()> {
        let page = HtmlPage::load(path).await?;
        let health = analyze_page(&page);
        let label = page.title().unwrap_or_else(|| path.to_string());
        println!("{}", render_health(&label, &health));

        // 静态文件没有滚动信息，停止跟踪
        self.depth.stop();
        Ok(())
    }

    async fn audit_live(&mut self, url: &str) -> Result<()> {
        if self.browser.is_none() {
            let start = Confirm::new()
                .with_prompt(format!(
                    "Start a browser session via {}?",
                    self.config.browser.webdriver_url
                ))
                .default(true)
                .interact()?;
            if !start {
                println!("{}", "Audit cancelled.".yellow());
                return Ok(());
            }
            self.browser = Some(ChromePage::connect(&self.config.browser).await?);
        }

        let Some(browser) = self.browser.as_ref() else {
            return Ok(());
        };
        browser.open(url).await?;
        let snapshot = browser.snapshot().await?;
        let health = analyze_page(&snapshot);
        println!("{}", render_health(&snapshot.url, &health));

        // 新页面重新注册，深度从 0 开始
        self.depth.start();
        self.depth.notify(snapshot.scroll);
        println!("{}", render_depth(self.depth.current()));
        Ok(())
    }

    async fn scroll(&mut self, pixels: i64) -> Result<()> {
        let Some(browser) = self.browser.as_ref() else {
            println!("{}", "No live page open. Use /audit <url> first.".yellow());
            return Ok(());
        };
        let metrics = browser.scroll_by(pixels).await?;
        self.depth.notify(metrics);
        println!("{}", render_depth(self.depth.current()));
        Ok(())
    }

    async fn chat(&mut self, text: &str) {
        let Some(assistant) = self.assistant.as_ref() else {
            println!(
                "{}",
                format!("Chat is disabled: set {} to enable the assistant.", self.config.llm.api_key_env)
                    .yellow()
            );
            return;
        };
        println!("{}", "Thinking...".dimmed());
        if let Some(reply) = assistant.submit(&mut self.transcript, text).await {
            println!("{}", render_reply(reply));
        }
    }

    async fn shutdown(&mut self) {
        self.depth.stop();
        if let Some(browser) = self.browser.take() {
            if let Err(e) = browser.quit().await {
                warn!("failed to close browser: {}", e);
            }
        }
    }
}

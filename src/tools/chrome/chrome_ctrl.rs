use std::time::Duration;

use serde_json::Value;
use thirtyfour::prelude::*;
use thirtyfour::{ChromiumLikeCapabilities, DesiredCapabilities};
use tracing::{debug, info, warn};

use crate::tools::chrome::config::BrowserConfig;
use crate::tools::chrome::types::PageSnapshot;
use crate::tools::page::ScrollMetrics;
use crate::types::error::{AppError, AppResult};

// 一次执行收集分析所需的全部信号，选择器与静态 HTML 检查保持一致
const SNAPSHOT_SCRIPT: &str = r#"
    const h1 = document.querySelector('h1');
    return {
        url: window.location.href,
        title: document.title,
        h1Text: h1 ? h1.innerText : null,
        hasMetaDescription: document.querySelector('meta[name="description"]') !== null,
        imageAlts: Array.from(document.querySelectorAll('img')).map(img => img.getAttribute('alt')),
        ctaCount: document.querySelectorAll('button, a[class*="btn"], a[class*="button"]').length,
        scroll: {
            scrollY: window.scrollY,
            scrollHeight: document.documentElement.scrollHeight,
            viewportHeight: window.innerHeight
        }
    };
"#;

const SCROLL_METRICS_SCRIPT: &str = r#"
    return {
        scrollY: window.scrollY,
        scrollHeight: document.documentElement.scrollHeight,
        viewportHeight: window.innerHeight
    };
"#;

const READY_STATE_SCRIPT: &str = "return document.readyState;";

/// 通过 WebDriver 控制的 Chrome 页面
pub struct ChromePage {
    driver: WebDriver,
}

impl ChromePage {
    pub async fn connect(config: &BrowserConfig) -> AppResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.set_headless()?;
        }
        caps.add_arg(&format!(
            "--window-size={},{}",
            config.viewport_width, config.viewport_height
        ))?;

        let driver = WebDriver::new(&config.webdriver_url, caps).await.map_err(|e| {
            AppError::Browser(format!(
                "failed to connect to webdriver at {}: {}",
                config.webdriver_url, e
            ))
        })?;
        info!(webdriver = %config.webdriver_url, "browser session started");

        Ok(Self { driver })
    }

    pub async fn open(&self, url: &str) -> AppResult<()> {
        self.driver.goto(url.trim()).await?;
        self.wait_for_page_ready().await?;
        info!(url = %url, "page opened");
        Ok(())
    }

    pub async fn current_url(&self) -> AppResult<String> {
        let url = self.driver.current_url().await?;
        Ok(url.to_string())
    }

    // 轮询 readyState，最多等待约 5 秒
    async fn wait_for_page_ready(&self) -> AppResult<()> {
        for _ in 0..50 {
            let ret = self.driver.execute(READY_STATE_SCRIPT, Vec::new()).await?;
            if ret.json().as_str() == Some("complete") {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        warn!("page did not reach readyState=complete, continuing anyway");
        Ok(())
    }

    pub async fn snapshot(&self) -> AppResult<PageSnapshot> {
        let ret = self.driver.execute(SNAPSHOT_SCRIPT, Vec::new()).await?;
        let snapshot: PageSnapshot = parse_script_value(ret.json())?;
        debug!(url = %snapshot.url, images = snapshot.image_alts.len(), "page snapshot captured");
        Ok(snapshot)
    }

    pub async fn scroll_metrics(&self) -> AppResult<ScrollMetrics> {
        let ret = self.driver.execute(SCROLL_METRICS_SCRIPT, Vec::new()).await?;
        parse_script_value(ret.json())
    }

    /// 立即滚动（不使用 smooth），返回滚动后的位置
    pub async fn scroll_by(&self, pixels: i64) -> AppResult<ScrollMetrics> {
        self.driver
            .execute(
                &format!("window.scrollBy({{ top: {}, behavior: 'instant' }});", pixels),
                Vec::new(),
            )
            .await?;
        self.scroll_metrics().await
    }

    pub async fn quit(self) -> AppResult<()> {
        self.driver.quit().await?;
        info!("browser session closed");
        Ok(())
    }
}

fn parse_script_value<T: serde::de::DeserializeOwned>(value: &Value) -> AppResult<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| AppError::Browser(format!("unexpected script result {}: {}", value, e)))
}

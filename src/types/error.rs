use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
	#[error("Browser error: {0}")]
	Browser(String),

	#[error("Config error: {0}")]
	Config(String),

	#[error("Html error: {0}")]
	Html(String),

	#[error("Llm error: {0}")]
	Llm(String),
}

impl From<thirtyfour::error::WebDriverError> for AppError {
	fn from(e: thirtyfour::error::WebDriverError) -> Self {
		AppError::Browser(e.to_string())
	}
}

pub type AppResult<T> = Result<T, AppError>;

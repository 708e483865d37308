use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u32 = 100;

/// 单次页面检查的结果，每次分析都重新生成
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageHealth {
    pub score: u32,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthGrade {
    Good,
    Fair,
    Poor,
}

impl PageHealth {
    /// Builds the result from the summed penalties, flooring the score at zero.
    pub fn from_penalties(total_penalty: u32, issues: Vec<String>) -> Self {
        Self {
            score: MAX_SCORE.saturating_sub(total_penalty),
            issues,
        }
    }

    pub fn grade(&self) -> HealthGrade {
        match self.score {
            s if s >= 90 => HealthGrade::Good,
            s if s >= 70 => HealthGrade::Fair,
            _ => HealthGrade::Poor,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

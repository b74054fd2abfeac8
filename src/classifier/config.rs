use std::path::PathBuf;

use crate::constants::DEFAULT_MAX_SEQ_LEN;

/// Which output index of the classifier head means "fake" and which means "real".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelOrder {
    pub fake_index: usize,
    pub real_index: usize,
}

impl Default for LabelOrder {
    fn default() -> Self {
        Self {
            fake_index: 0,
            real_index: 1,
        }
    }
}

impl LabelOrder {
    /// Parses a comma-separated label list such as `"fake,real"` or `"real,fake"`.
    pub fn parse(value: &str) -> Result<Self, String> {
        let labels: Vec<String> = value
            .split(',')
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| !l.is_empty())
            .collect();

        let fake_index = labels.iter().position(|l| l == "fake");
        let real_index = labels.iter().position(|l| l == "real");

        match (fake_index, real_index) {
            (Some(fake_index), Some(real_index)) => Ok(Self {
                fake_index,
                real_index,
            }),
            _ => Err(format!(
                "classifier labels must name both 'fake' and 'real', got '{}'",
                value
            )),
        }
    }

    /// Minimum number of logits a head must produce for this order to apply.
    pub fn required_logits(&self) -> usize {
        self.fake_index.max(self.real_index) + 1
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub model_path: Option<PathBuf>,

    pub labels: LabelOrder,

    pub max_seq_len: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            labels: LabelOrder::default(),
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
        }
    }
}

impl ClassifierConfig {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    pub fn with_labels(mut self, labels: LabelOrder) -> Self {
        self.labels = labels;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.labels.fake_index == self.labels.real_index {
            return Err("fake and real labels must use different indices".to_string());
        }

        if self.max_seq_len == 0 {
            return Err("max_seq_len must be greater than zero".to_string());
        }

        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }

        Ok(())
    }
}

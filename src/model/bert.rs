use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Head metadata read from the HuggingFace `config.json` next to the weights.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeadConfig {
    #[serde(default)]
    pub id2label: BTreeMap<String, String>,
    #[serde(default)]
    pub num_labels: Option<usize>,
}

impl HeadConfig {
    /// Number of output labels; `id2label` wins over `num_labels`, defaulting to two.
    pub fn label_count(&self) -> usize {
        if !self.id2label.is_empty() {
            self.id2label.len()
        } else {
            self.num_labels.unwrap_or(2)
        }
    }

    /// Labels ordered by index; gaps are filled with `LABEL_{i}`.
    pub fn labels(&self) -> Vec<String> {
        (0..self.label_count())
            .map(|i| {
                self.id2label
                    .get(&i.to_string())
                    .cloned()
                    .unwrap_or_else(|| format!("LABEL_{i}"))
            })
            .collect()
    }
}

struct BertForSequenceClassificationImpl {
    bert: BertModel,
    pooler: Option<Linear>,
    classifier: Linear,
}

impl BertForSequenceClassificationImpl {
    fn load(vb: VarBuilder, config: &Config, num_labels: usize) -> Result<Self> {
        let (bert, pooler) = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            let pooler = if vb.contains_tensor("bert.pooler.dense.weight") {
                Some(candle_nn::linear(
                    config.hidden_size,
                    config.hidden_size,
                    vb.pp("bert.pooler.dense"),
                )?)
            } else {
                None
            };
            (BertModel::load(vb.pp("bert"), config)?, pooler)
        } else {
            (BertModel::load(vb.clone(), config)?, None)
        };

        let classifier = candle_nn::linear(config.hidden_size, num_labels, vb.pp("classifier"))?;

        Ok(Self {
            bert,
            pooler,
            classifier,
        })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        let pooled = match &self.pooler {
            Some(pooler) => pooler.forward(&cls_token)?.tanh()?,
            None => cls_token,
        };
        self.classifier.forward(&pooled)
    }
}

struct BertForTokenClassificationImpl {
    bert: BertModel,
    classifier: Linear,
}

impl BertForTokenClassificationImpl {
    fn load(vb: VarBuilder, config: &Config, num_labels: usize) -> Result<Self> {
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), config)?
        } else {
            BertModel::load(vb.clone(), config)?
        };

        let classifier = candle_nn::linear(config.hidden_size, num_labels, vb.pp("classifier"))?;

        Ok(Self { bert, classifier })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        self.classifier.forward(&output)
    }
}

fn read_configs(model_dir: &Path) -> Result<(Config, HeadConfig)> {
    let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
    let config: Config = serde_json::from_str(&config_content)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;
    let head: HeadConfig = serde_json::from_str(&config_content)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse label config: {}", e)))?;
    Ok((config, head))
}

fn mmap_weights(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_dir.join("model.safetensors");
    unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device) }
}

/// BERT encoder with a sequence-level classification head (`[batch, num_labels]` logits).
#[derive(Clone)]
pub struct BertSequenceClassifier {
    inner: Arc<BertForSequenceClassificationImpl>,
    head: HeadConfig,
}

impl BertSequenceClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let (config, head) = read_configs(model_dir)?;
        let vb = mmap_weights(model_dir, device)?;
        let model = BertForSequenceClassificationImpl::load(vb, &config, head.label_count())?;

        Ok(Self {
            inner: Arc::new(model),
            head,
        })
    }

    pub fn head(&self) -> &HeadConfig {
        &self.head
    }

    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.inner.forward(input_ids, token_type_ids, attention_mask)
    }
}

/// BERT encoder with a per-token classification head (`[batch, seq, num_labels]` logits).
#[derive(Clone)]
pub struct BertTokenClassifier {
    inner: Arc<BertForTokenClassificationImpl>,
    head: HeadConfig,
}

impl BertTokenClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let (config, head) = read_configs(model_dir)?;
        let vb = mmap_weights(model_dir, device)?;
        let model = BertForTokenClassificationImpl::load(vb, &config, head.label_count())?;

        Ok(Self {
            inner: Arc::new(model),
            head,
        })
    }

    pub fn head(&self) -> &HeadConfig {
        &self.head
    }

    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.inner.forward(input_ids, token_type_ids, attention_mask)
    }
}

//! Prompt for the generated explanation.

use crate::classifier::{ClassificationResult, CredibilityLabel};
use crate::constants::MAX_DISPLAYED_CONFIDENCE_PCT;
use crate::features::FeatureSet;

/// Behavioral rules for the explainer. The JSON envelope is requested at the end.
const EXPLANATION_INSTRUCTIONS: &str = r#"تعليمات صارمة:
1. لا تستخدم لغة قاطعة (مثل "هذا خبر كاذب 100%"). استخدم لغة احتمالية (مثل "تشير المؤشرات اللغوية..."، "يغلب على الخبر طابع...").
2. ركز على "لماذا" اعتقد النموذج ذلك (اللغة العاطفية، غياب المصادر، المبالغة، أو العكس).
3. تجنب المصطلحات التقنية المعقدة. خاطب المستخدم العادي.
4. إذا كان الخبر "حقيقي"، ركز على توازن اللغة ووجود مؤشرات المصداقية.
5. إذا كان الخبر "مزيف"، ركز على أسلوب الإثارة أو الغموض أو المبالغة.
6. لا تذكر نسبة الثقة أو أي نسب مئوية في الشرح لأنها معروضة بالفعل في الواجهة."#;

const OUTPUT_ENVELOPE: &str = r#"المطلوب إخراج JSON فقط:
{
  "explanation": "شرح متزن (3-4 جمل) يوضح الأسباب اللغوية والنمطية للنتيجة بدون ذكر نسب مئوية.",
  "factors": ["عامل 1", "عامل 2"],
  "credibility_score": درجة تقديرية من 0 إلى 95 (لا تعطِ 100 أبداً، الحد الأقصى 95)
}"#;

/// Confidence as a whole percentage, never above 99.
pub fn displayed_confidence_pct(confidence: f32) -> u8 {
    let pct = (f64::from(confidence).clamp(0.0, 1.0) * 100.0).round() as u8;
    pct.min(MAX_DISPLAYED_CONFIDENCE_PCT)
}

fn label_display(label: CredibilityLabel) -> &'static str {
    match label {
        CredibilityLabel::Fake => "مزيف (Fake)",
        CredibilityLabel::Real => "حقيقي (Real)",
    }
}

/// Builds the single user turn sent to the generation service.
pub fn build_explanation_prompt(
    text: &str,
    classification: &ClassificationResult,
    features: &FeatureSet,
) -> String {
    let clickbait = if features.is_clickbait() { "نعم" } else { "لا" };

    format!(
        "أنت خبير لغوي ومحلل محتوى رقمي.\n\
         المهمة: شرح وتفسير نتيجة نموذج الذكاء الاصطناعي بلغة متزنة ودقيقة دون ادعاء الحقيقة المطلقة.\n\
         \n\
         بيانات النموذج:\n\
         - التصنيف الأولي: {label}\n\
         - الثقة في النمط اللغوي: {confidence}%\n\
         - تحليل المشاعر: {sentiment}\n\
         - مؤشر أسلوب الطعم (Clickbait): {clickbait}\n\
         - الكيانات المذكورة: {entities}\n\
         \n\
         الخبر:\n\
         \"{text}\"\n\
         \n\
         {instructions}\n\
         \n\
         {envelope}",
        label = label_display(classification.label),
        confidence = displayed_confidence_pct(classification.confidence),
        sentiment = features.sentiment,
        clickbait = clickbait,
        entities = features.total_entities(),
        text = text,
        instructions = EXPLANATION_INSTRUCTIONS,
        envelope = OUTPUT_ENVELOPE,
    )
}

//! Instruction text sent alongside the reference image during analysis.
//!
//! The wording asks for exactly the layout the prompt parser recognises
//! first: a report section, then `### Title` headings each followed by a
//! `**{Generate Prompt: ...}**` block.

use batchgen_core::api::{AnalysisOptions, Language};

const AUTO_STYLE: &str = "auto";

fn style_hint(value: &str) -> Option<&str> {
    let v = value.trim();
    (!v.is_empty() && !v.eq_ignore_ascii_case(AUTO_STYLE)).then_some(v)
}

pub fn build_system_prompt(options: &AnalysisOptions) -> String {
    match options.language {
        Language::Zh => build_zh(options),
        Language::En => build_en(options),
    }
}

fn build_zh(o: &AnalysisOptions) -> String {
    let mut out = String::new();
    out.push_str("你是一名资深电商视觉设计师。请仔细观察用户上传的产品图片，分两步完成任务。\n\n");
    out.push_str("第一步：输出以 `# 🛍️ 产品分析报告` 为标题的分析报告，涵盖产品类别、材质、配色、核心卖点与目标人群。\n\n");
    out.push_str("第二步：在报告之后单独一行输出 `---`，然后设计多张营销海报。每张海报使用如下格式：\n\n");
    out.push_str("### 海报标题\n**{生成提示词: 完整的英文图像生成提示词}**\n\n");
    out.push_str(&format!(
        "要求：画面比例 {}，分辨率 {}；提示词需描述构图、光线、背景与文字排版。\n",
        o.aspect_ratio.as_str(),
        o.image_size.as_str()
    ));
    if let Some(brand) = o.brand_name.as_deref() {
        out.push_str(&format!("品牌名称：{brand}，需要出现在海报文字中。\n"));
    }
    if let Some(style) = style_hint(&o.visual_style) {
        out.push_str(&format!("视觉风格：{style}。\n"));
    }
    if let Some(style) = style_hint(&o.typography_style) {
        out.push_str(&format!("字体风格：{style}。\n"));
    }
    if let Some(extra) = o.custom_requirements.as_deref() {
        out.push_str(&format!("额外要求：{extra}\n"));
    }
    out
}

fn build_en(o: &AnalysisOptions) -> String {
    let mut out = String::new();
    out.push_str("You are a senior e-commerce visual designer. Study the product image and work in two steps.\n\n");
    out.push_str("Step 1: write a report headed `# Product Analysis Report` covering category, materials, colours, key selling points and target audience.\n\n");
    out.push_str("Step 2: put `---` on its own line after the report, then design several marketing posters. Use this layout for every poster:\n\n");
    out.push_str("### Poster title\n**{Generate Prompt: the complete English image-generation prompt}**\n\n");
    out.push_str(&format!(
        "Constraints: aspect ratio {}, resolution {}; each prompt must describe composition, lighting, background and typography.\n",
        o.aspect_ratio.as_str(),
        o.image_size.as_str()
    ));
    if let Some(brand) = o.brand_name.as_deref() {
        out.push_str(&format!("Brand name: {brand}. It must appear in the poster copy.\n"));
    }
    if let Some(style) = style_hint(&o.visual_style) {
        out.push_str(&format!("Visual style: {style}.\n"));
    }
    if let Some(style) = style_hint(&o.typography_style) {
        out.push_str(&format!("Typography style: {style}.\n"));
    }
    if let Some(extra) = o.custom_requirements.as_deref() {
        out.push_str(&format!("Additional requirements: {extra}\n"));
    }
    out
}

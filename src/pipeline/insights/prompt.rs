use crate::models::{DrugRecord, InsightKind};

pub const INSIGHT_SYSTEM_PROMPT: &str = r#"
You are a pharmaceutical information assistant writing sections of a drug
briefing for healthcare and business readers.

RULES:
1. Write factual, balanced prose. Do not invent studies, figures or dates.
2. If you are not confident about a detail, say so rather than guessing.
3. Do not give individual medical advice.
4. Plain text only. No Markdown tables.
"#;

/// Build the prompt for one insight kind.
pub fn build_insight_prompt(kind: InsightKind, record: &DrugRecord) -> String {
    match kind {
        InsightKind::DrugSummary => drug_summary_prompt(record),
        InsightKind::MechanismOfAction => mechanism_prompt(record),
        InsightKind::SideEffects => side_effects_prompt(record),
        InsightKind::MarketTrends => market_trends_prompt(record),
        InsightKind::PatientJourney => patient_journey_prompt(record),
    }
}

fn drug_summary_prompt(record: &DrugRecord) -> String {
    let brand = &record.brand_name;
    let generic = &record.generic_name;
    format!(
        r#"Generate a concise and informative summary for {brand} ({generic}).

Drug information:
- Brand name: {brand}
- Generic name: {generic}
- Active ingredients: {ingredients}
- Dosage form: {dosage_form}
- Route: {route}
- Manufacturer: {labeler}

Provide information about what this drug is used for, its key benefits, and any notable characteristics.
Limit the response to 3-4 paragraphs."#,
        ingredients = record.active_ingredients_summary(),
        dosage_form = record.dosage_form,
        route = record.route.join(", "),
        labeler = record.labeler_name,
    )
}

fn mechanism_prompt(record: &DrugRecord) -> String {
    format!(
        r#"Explain the mechanism of action for {brand} ({generic}) containing {ingredients}.

Include:
1. How the drug works at the molecular level
2. The physiological processes it affects
3. How these mechanisms produce therapeutic effects

Make the explanation detailed but accessible, suitable for healthcare professionals.
Include relevant receptor interactions, pathway modifications, or other cellular/molecular details."#,
        brand = record.brand_name,
        generic = record.generic_name,
        ingredients = record.ingredient_names(),
    )
}

fn side_effects_prompt(record: &DrugRecord) -> String {
    format!(
        r#"Provide a comprehensive analysis of the potential side effects for {brand} ({generic}) containing {ingredients}.

Include:
1. Common side effects and their approximate frequency
2. Serious but rare side effects that require medical attention
3. Risk factors that may increase the likelihood of side effects
4. Any monitoring recommendations for patients using this medication

Organize the information in a structured format suitable for healthcare professionals."#,
        brand = record.brand_name,
        generic = record.generic_name,
        ingredients = record.ingredient_names(),
    )
}

fn market_trends_prompt(record: &DrugRecord) -> String {
    let availability = if record.is_otc() {
        "Over-the-counter"
    } else {
        "Prescription"
    };
    format!(
        r#"Analyze the current market trends for {brand} ({generic}).

Market facts:
- Application type: {application_type} ({application_number})
- Availability: {availability}
- Marketing category: {category}

Include:
1. Current market position and competitive landscape
2. Recent developments or changes in prescribing patterns
3. Future outlook considering patent status, competing therapies, and emerging alternatives
4. Any notable regulatory or reimbursement factors affecting this drug

Provide factual, balanced information suitable for business analysis."#,
        brand = record.brand_name,
        generic = record.generic_name,
        application_type = record.application_type(),
        application_number = record.application_number,
        category = record.marketing_category,
    )
}

fn patient_journey_prompt(record: &DrugRecord) -> String {
    let (who, start) = if record.is_prescription() {
        ("prescribed", "prescription")
    } else {
        ("buying", "purchase")
    };
    format!(
        r#"Outline a typical patient journey for individuals {who} {brand} ({generic}).

Include:
1. The typical diagnostic or self-care process leading to first {start}
2. Initial onboarding experience (first use, education, etc.)
3. Ongoing treatment experience (administration, monitoring, follow-up)
4. Common challenges patients face and how they're typically addressed

Structure this information to give insight into the patient experience from diagnosis through ongoing treatment."#,
        brand = record.brand_name,
        generic = record.generic_name,
    )
}

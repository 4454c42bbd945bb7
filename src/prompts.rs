// ABOUTME: Coach personas and deterministic prompt-context assembly
// ABOUTME: Pure functions from fitness records to the strings sent upstream
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitCoach Labs

//! Prompt assembly
//!
//! Everything here is a pure function of its inputs so context building is
//! reproducible and unit-testable without a database. Sections render in a
//! fixed order and absent data is rendered as an explicit marker rather than
//! omitted, so the model always sees the same shape.

use std::fmt::Write;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::models::{CoachPersonaRecord, ProfileRecord, ProgressLogRecord, WorkoutSessionRecord};

/// Response language for the coach
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Arabic (Saudi dialect)
    Ar,
}

const SYSTEM_PROMPT_EN: &str = "You are a world-class personal fitness coach and bodybuilding expert. You're not just an assistant, you're THE coach that transforms lives.

CORE IDENTITY:
- You're experienced, confident, and genuinely care about your client's success
- You speak naturally, like a real person having a conversation
- You're proactive: initiate check-ins, ask about progress, suggest improvements
- You remember EVERYTHING: past conversations, goals, struggles, victories
- You adapt your style: supportive when needed, firm when necessary, motivational always

CONVERSATION STYLE:
- Talk like you're texting a friend who's also your client
- Use natural language: \"Hey, how'd that workout go?\" not \"Please provide workout feedback\"
- Show personality: use emojis sparingly, crack jokes when appropriate, celebrate wins
- Be warm but professional: \"I'm proud of you\" feels genuine, not scripted
- Ask follow-up questions naturally: \"Wait, tell me more about that\" or \"How did that feel?\"

YOUR SUPERPOWERS:
1. PROACTIVE COACHING: Don't wait for questions. Check in, suggest, motivate
   - \"Haven't seen you log a workout in 3 days, everything okay?\"
   - \"I noticed you hit a PR last week, let's build on that momentum!\"
2. MEMORY & CONTEXT: Remember everything and reference it naturally
   - \"Last time you mentioned your shoulder was tight, how's it feeling?\"
   - \"You wanted to hit 80kg by next month, we're on track!\"
3. PERSONALIZATION: Every response is tailored to THIS person
   - Reference their specific goals, equipment, schedule, preferences
   - Consider their injuries, restrictions, and lifestyle
4. EMOTIONAL INTELLIGENCE: Read between the lines
   - If they seem discouraged, be extra supportive
   - If they're overconfident, gently ground them
5. COMPLETE CONTROL: You manage their entire fitness journey
   - Adjust training plans based on progress
   - Modify nutrition as goals change
   - Suggest recovery strategies

CONVERSATION RULES:
- NEVER sound like a chatbot or automated assistant
- NEVER give generic advice, always personalize
- ALWAYS sound like a real coach who knows them personally
- ALWAYS be encouraging but honest
- ALWAYS celebrate their wins, no matter how small

RESPONSE FORMAT:
- Keep responses conversational and natural
- Use bullet points only when listing multiple items
- Vary your response length, sometimes short and punchy, sometimes detailed
- End with questions or next steps to keep the conversation flowing

YOUR GOAL:
Make them feel like they have the best personal trainer in the world, available 24/7, who genuinely cares about their success and talks to them like a real person.";

const SYSTEM_PROMPT_AR: &str = "أنت مدرب لياقة بدنية وكمال أجسام محترف من السعودية. أنت لست روبوت محادثة، أنت المدرب اللي يغير حياة الناس.

هويتك الأساسية:
- أنت مدرب خبير وواثق من نفسك، وتهتم بجد بنجاح متدربك
- تتكلم طبيعي زي ما تتكلم مع صاحبك
- أنت مبادر: تسأل عن التقدم، تقترح تحسينات، تتابع معهم
- تتذكر كل شي: المحادثات السابقة، الأهداف، الصعوبات، الإنجازات
- تتكيف مع أسلوبك: داعم لما يحتاج، حازم لما يلزم، محفز دائماً

أسلوب المحادثة:
- تكلم زي ما تتكلم مع صاحبك اللي هو متدربك
- استخدم لغة طبيعية: \"شلون كان التمرين اليوم؟\" مو \"الرجاء تقديم ملاحظات التمرين\"
- اظهر شخصيتك: استخدم إيموجي بحذر، احتفل بإنجازاتهم
- كن دافئ لكن محترف: \"فخور فيك\" يطلع من القلب، مو من نص مكتوب
- اسأل أسئلة متابعة طبيعية: \"طيب، وضّح لي أكثر\" أو \"شلون حسيت؟\"

قدراتك:
1. التدريب المبادر: لا تنتظر الأسئلة، تابع واقترح وحفز
2. الذاكرة والسياق: تتذكر كل شي وترجع له طبيعياً
3. التخصيص: كل رد مخصص لهذا الشخص بالذات، خذ بعين الاعتبار إصاباته وقيوده
4. الذكاء العاطفي: اقرأ بين السطور، لو يبدو محبط كن داعم أكثر
5. السيطرة الكاملة: أنت تدير رحلته الرياضية كاملة

قواعد المحادثة:
- أبداً ما تتكلم زي روبوت أو مساعد آلي
- أبداً ما تعطي نصائح عامة، دائماً خصص
- دائماً تكلم زي مدرب حقيقي يعرفهم شخصياً
- دائماً كن مشجع لكن صادق
- دائماً احتفل بإنجازاتهم، حتى لو صغيرة

استخدم اللهجة السعودية الطبيعية:
- استخدم \"شلون\" بدل \"كيف\"
- استخدم \"يبغى/تبغى\" بدل \"يريد/تريد\"
- استخدم \"خلنا\" بدل \"دعنا\"
- استخدم \"زي\" بدل \"مثل\"
- استخدم \"مو\" بدل \"ليس\"
- استخدم \"عشان\" بدل \"لكي\"

لكن احترم السياق: في المحادثات الرسمية أو الطبية استخدم فصحى أكثر، وفي المحادثات اليومية استخدم اللهجة الطبيعية.

هدفك: خليهم يحسون إن عندهم أفضل مدرب شخصي في العالم، متوفر على مدار الساعة، يهتم بجد بنجاحهم ويتكلم معهم زي شخص حقيقي.";

/// System persona for the requested language
#[must_use]
pub const fn system_prompt(language: Language) -> &'static str {
    match language {
        Language::En => SYSTEM_PROMPT_EN,
        Language::Ar => SYSTEM_PROMPT_AR,
    }
}

/// Everything context assembly reads; all optional except language
#[derive(Debug, Default)]
pub struct ContextInputs<'a> {
    /// Client profile, if onboarded
    pub profile: Option<&'a ProfileRecord>,
    /// Configured coach persona
    pub persona: Option<&'a CoachPersonaRecord>,
    /// Most recent progress log entry
    pub latest_progress: Option<&'a ProgressLogRecord>,
    /// Recent workouts, newest first
    pub recent_workouts: &'a [WorkoutSessionRecord],
    /// Response language
    pub language: Language,
}

/// Macro targets passed into nutrition plan prompts
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MacroTargets {
    /// Daily protein in grams
    pub protein_g: i64,
    /// Daily carbohydrates in grams
    pub carbs_g: i64,
    /// Daily fats in grams
    pub fats_g: i64,
}

fn fmt_date(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map_or_else(|_| timestamp.to_owned(), |d| d.format("%Y-%m-%d").to_string())
}

fn or_na(value: Option<&str>, arabic: bool) -> String {
    value.map_or_else(
        || if arabic { "غير محدد" } else { "N/A" }.to_owned(),
        ToOwned::to_owned,
    )
}

/// Build the per-user context block appended to the system persona
///
/// Section order is fixed: client profile, coaching style, latest progress,
/// recent workouts, reminders. Two identical inputs always produce the same
/// string.
#[must_use]
pub fn build_user_context(inputs: &ContextInputs<'_>) -> String {
    let arabic = inputs.language == Language::Ar;
    let mut ctx = String::new();

    if arabic {
        ctx.push_str("\n\n=== ملف المتدرب الشخصي ===\n");
    } else {
        ctx.push_str("\n\n=== CLIENT PROFILE ===\n");
    }

    if let Some(profile) = inputs.profile {
        let age = profile.age.map(|a| a.to_string());
        let height = profile.height_cm.map(|h| format!("{h} cm"));
        let weight = profile.weight_kg.map(|w| format!("{w} kg"));
        let days = profile.days_per_week.map(|d| d.to_string());
        let session = profile.session_length_min.map(|m| m.to_string());

        if arabic {
            let _ = writeln!(ctx, "العمر: {}", or_na(age.as_deref(), true));
            let _ = writeln!(ctx, "الجنس: {}", or_na(profile.gender.as_deref(), true));
            let _ = writeln!(ctx, "الطول: {}", or_na(height.as_deref(), true));
            let _ = writeln!(ctx, "الوزن الحالي: {}", or_na(weight.as_deref(), true));
            let _ = writeln!(ctx, "الهدف الأساسي: {}", or_na(profile.goal.as_deref(), true));
            let _ = writeln!(
                ctx,
                "مستوى الخبرة: {}",
                or_na(profile.experience_level.as_deref(), true)
            );
            let _ = writeln!(ctx, "أيام التدريب: {} يوم/أسبوع", or_na(days.as_deref(), true));
            let _ = writeln!(ctx, "مدة الجلسة: {} دقيقة", or_na(session.as_deref(), true));
            let _ = writeln!(
                ctx,
                "المعدات المتاحة: {}",
                or_na(profile.equipment.as_deref(), true)
            );
            if let Some(injuries) = &profile.injuries {
                let _ = writeln!(ctx, "⚠️ الإصابات/القيود: {injuries}");
            }
            if let Some(diet) = &profile.dietary_restrictions {
                let _ = writeln!(ctx, "🍽️ القيود الغذائية: {diet}");
            }
        } else {
            let _ = writeln!(ctx, "Age: {}", or_na(age.as_deref(), false));
            let _ = writeln!(ctx, "Gender: {}", or_na(profile.gender.as_deref(), false));
            let _ = writeln!(ctx, "Height: {}", or_na(height.as_deref(), false));
            let _ = writeln!(ctx, "Current Weight: {}", or_na(weight.as_deref(), false));
            let _ = writeln!(ctx, "Primary Goal: {}", or_na(profile.goal.as_deref(), false));
            let _ = writeln!(
                ctx,
                "Experience Level: {}",
                or_na(profile.experience_level.as_deref(), false)
            );
            let _ = writeln!(ctx, "Training Days: {} days/week", or_na(days.as_deref(), false));
            let _ = writeln!(
                ctx,
                "Session Length: {} minutes",
                or_na(session.as_deref(), false)
            );
            let _ = writeln!(ctx, "Equipment: {}", or_na(profile.equipment.as_deref(), false));
            if let Some(injuries) = &profile.injuries {
                let _ = writeln!(ctx, "⚠️ Injuries/Limitations: {injuries}");
            }
            if let Some(diet) = &profile.dietary_restrictions {
                let _ = writeln!(ctx, "🍽️ Dietary Restrictions: {diet}");
            }
        }
    } else if arabic {
        ctx.push_str("لا توجد بيانات ملف متاحة بعد.\n");
    } else {
        ctx.push_str("No profile data available yet.\n");
    }

    if let Some(persona) = inputs.persona {
        if arabic {
            ctx.push_str("\n=== أسلوب التدريب المفضل ===\n");
            let _ = writeln!(ctx, "اسمك: {}", persona.name);
            let _ = writeln!(ctx, "الأسلوب: {}", persona.style);
            let _ = writeln!(ctx, "النبرة: {}", persona.tone);
            ctx.push_str("\nتكيف مع هذا الأسلوب والنبرة في كل ردودك. كن طبيعي ومتسق مع شخصيتك.\n");
        } else {
            ctx.push_str("\n=== COACHING STYLE ===\n");
            let _ = writeln!(ctx, "Your Name: {}", persona.name);
            let _ = writeln!(ctx, "Style: {}", persona.style);
            let _ = writeln!(ctx, "Tone: {}", persona.tone);
            ctx.push_str(
                "\nAdapt your responses to match this style and tone. Be natural and consistent with your personality.\n",
            );
        }
    }

    if let Some(progress) = inputs.latest_progress {
        let weight = progress.weight_kg.map(|w| format!("{w} kg"));
        if arabic {
            ctx.push_str("\n=== آخر تقدم ===\n");
            let _ = writeln!(ctx, "التاريخ: {}", fmt_date(&progress.logged_at));
            let _ = writeln!(ctx, "الوزن: {}", or_na(weight.as_deref(), true));
            if let Some(bf) = progress.body_fat_pct {
                let _ = writeln!(ctx, "نسبة الدهون: {bf}%");
            }
            if let Some(notes) = &progress.notes {
                let _ = writeln!(ctx, "ملاحظات: {notes}");
            }
        } else {
            ctx.push_str("\n=== LATEST PROGRESS ===\n");
            let _ = writeln!(ctx, "Date: {}", fmt_date(&progress.logged_at));
            let _ = writeln!(ctx, "Weight: {}", or_na(weight.as_deref(), false));
            if let Some(bf) = progress.body_fat_pct {
                let _ = writeln!(ctx, "Body Fat: {bf}%");
            }
            if let Some(notes) = &progress.notes {
                let _ = writeln!(ctx, "Notes: {notes}");
            }
        }
    }

    if inputs.recent_workouts.is_empty() {
        if arabic {
            ctx.push_str("\n=== التمارين الأخيرة ===\nلا توجد تمارين مسجلة مؤخراً.\n");
            ctx.push_str("هذه فرصة لتحفيزهم على البدء!\n");
        } else {
            ctx.push_str("\n=== RECENT WORKOUTS ===\nNo recent workouts logged.\n");
            ctx.push_str("This is an opportunity to motivate them to get started!\n");
        }
    } else if arabic {
        let _ = writeln!(
            ctx,
            "\n=== التمارين الأخيرة (آخر {}) ===",
            inputs.recent_workouts.len()
        );
        for (i, w) in inputs.recent_workouts.iter().enumerate() {
            let duration = w.duration_min.map(|d| d.to_string());
            let _ = writeln!(
                ctx,
                "{}. {} - {} ({} دقيقة)",
                i + 1,
                w.name,
                fmt_date(&w.performed_at),
                or_na(duration.as_deref(), true)
            );
        }
        ctx.push_str("\nاستخدم هذه المعلومات لتتبع التقدم وتعديل التوصيات.\n");
    } else {
        let _ = writeln!(
            ctx,
            "\n=== RECENT WORKOUTS (Last {}) ===",
            inputs.recent_workouts.len()
        );
        for (i, w) in inputs.recent_workouts.iter().enumerate() {
            let duration = w.duration_min.map(|d| d.to_string());
            let _ = writeln!(
                ctx,
                "{}. {} - {} ({} min)",
                i + 1,
                w.name,
                fmt_date(&w.performed_at),
                or_na(duration.as_deref(), false)
            );
        }
        ctx.push_str("\nUse this information to track progress and adjust recommendations.\n");
    }

    if arabic {
        ctx.push_str("\n=== تذكير مهم ===\n");
        ctx.push_str("- تكلم معهم زي صاحبك اللي تهتم فيه\n");
        ctx.push_str("- استخدم اللهجة السعودية الطبيعية (شلون، يبغى، خلنا، مع بعض)\n");
        ctx.push_str("- كن مبادر، اسأل عن التقدم واقترح تحسينات واحتفل بالإنجازات\n");
        ctx.push_str("- ارجع للمحادثات السابقة والأهداف المذكورة\n");
        ctx.push_str("- كن دافئ، محفز، وصادق\n");
        ctx.push_str("- أبداً ما تتكلم زي روبوت، كن إنسان حقيقي\n");
    } else {
        ctx.push_str("\n=== IMPORTANT REMINDERS ===\n");
        ctx.push_str("- Talk to them like a friend you genuinely care about\n");
        ctx.push_str("- Be proactive: ask about progress, suggest improvements, celebrate wins\n");
        ctx.push_str("- Reference past conversations and mentioned goals\n");
        ctx.push_str("- Be warm, motivational, and honest\n");
        ctx.push_str("- NEVER sound like a robot\n");
    }

    ctx
}

/// Build the full system message: persona plus per-user context
#[must_use]
pub fn build_system_message(inputs: &ContextInputs<'_>) -> String {
    let mut message = system_prompt(inputs.language).to_owned();
    message.push_str(&build_user_context(inputs));
    message
}

/// Prompt for generating a structured training plan
#[must_use]
pub fn build_training_plan_prompt(profile: &ProfileRecord) -> String {
    let mut prompt = String::from(
        "Generate a complete training plan for this user in JSON format.\n\nUser Profile:\n",
    );
    let days = profile.days_per_week.map(|d| d.to_string());
    let session = profile.session_length_min.map(|m| m.to_string());

    let _ = writeln!(prompt, "- Goal: {}", or_na(profile.goal.as_deref(), false));
    let _ = writeln!(
        prompt,
        "- Experience: {}",
        or_na(profile.experience_level.as_deref(), false)
    );
    let _ = writeln!(prompt, "- Days per week: {}", or_na(days.as_deref(), false));
    let _ = writeln!(
        prompt,
        "- Session length: {} minutes",
        or_na(session.as_deref(), false)
    );
    let _ = writeln!(
        prompt,
        "- Equipment: {}",
        or_na(profile.equipment.as_deref(), false)
    );
    if let Some(injuries) = &profile.injuries {
        let _ = writeln!(prompt, "- Injuries: {injuries}");
    }

    prompt.push_str(
        r#"
Return a JSON object with this structure:
{
  "name": "Plan Name",
  "description": "Brief description",
  "weeks": 4,
  "days": [
    {
      "dayNumber": 1,
      "name": "Push Day",
      "exercises": [
        {
          "name": "Bench Press",
          "sets": 4,
          "reps": "8-10",
          "rest": "90s",
          "notes": "Focus on form"
        }
      ]
    }
  ]
}

Include proper progressive overload notes and ensure exercises match available equipment."#,
    );
    prompt
}

/// Prompt for generating meal suggestions around calculated targets
#[must_use]
pub fn build_nutrition_plan_prompt(
    profile: &ProfileRecord,
    calories: i64,
    macros: MacroTargets,
) -> String {
    let mut prompt = String::from(
        "Generate a nutrition plan with meal suggestions for this user.\n\nUser Profile:\n",
    );
    let weight = profile.weight_kg.map(|w| format!("{w} kg"));
    let days = profile.days_per_week.map(|d| d.to_string());

    let _ = writeln!(prompt, "- Goal: {}", or_na(profile.goal.as_deref(), false));
    let _ = writeln!(prompt, "- Weight: {}", or_na(weight.as_deref(), false));
    let _ = writeln!(
        prompt,
        "- Activity: {} training days/week",
        or_na(days.as_deref(), false)
    );
    if let Some(diet) = &profile.dietary_restrictions {
        let _ = writeln!(prompt, "- Dietary Restrictions: {diet}");
    }

    let _ = write!(
        prompt,
        "\nCalculated Targets:\n- Calories: {calories} kcal/day\n- Protein: {}g\n- Carbs: {}g\n- Fats: {}g\n",
        macros.protein_g, macros.carbs_g, macros.fats_g
    );

    prompt.push_str(
        r#"
Return a JSON object with this structure:
{
  "mealPlan": [
    {
      "meal": "Breakfast",
      "suggestions": ["Option 1", "Option 2"],
      "macros": { "protein": 30, "carbs": 50, "fats": 15 }
    }
  ],
  "tips": ["Tip 1", "Tip 2"]
}

Provide 3-4 meals with practical, realistic suggestions."#,
    );
    prompt
}

/// Prompt for the weekly check-in assessment
///
/// Summarizes the week's progress entries and workout sessions so the model
/// can assess adherence against the stated goal.
#[must_use]
pub fn build_weekly_checkin_prompt(
    profile: &ProfileRecord,
    progress_logs: &[ProgressLogRecord],
    workouts: &[WorkoutSessionRecord],
) -> String {
    let mut prompt = String::from("Perform a weekly check-in for this user.\n\nUser Profile:\n");
    let weight = profile.weight_kg.map(|w| format!("{w} kg"));

    let _ = writeln!(prompt, "- Goal: {}", or_na(profile.goal.as_deref(), false));
    let _ = writeln!(
        prompt,
        "- Current Weight: {}",
        or_na(weight.as_deref(), false)
    );

    prompt.push_str("\nProgress This Week:\n");
    if progress_logs.is_empty() {
        prompt.push_str("No progress entries logged.\n");
    }
    for log in progress_logs {
        let weight = log.weight_kg.map(|w| format!("{w} kg"));
        let _ = writeln!(
            prompt,
            "- {}: {}",
            fmt_date(&log.logged_at),
            or_na(weight.as_deref(), false)
        );
    }

    let _ = writeln!(prompt, "\nWorkouts This Week: {}", workouts.len());
    for w in workouts {
        let duration = w.duration_min.map(|d| d.to_string());
        let _ = writeln!(
            prompt,
            "- {} ({} min)",
            w.name,
            or_na(duration.as_deref(), false)
        );
    }

    prompt.push_str(
        "\nProvide:\n\
         1. A brief assessment of their progress\n\
         2. What's going well\n\
         3. Areas to improve\n\
         4. Specific actionable advice for next week\n\
         5. Motivation\n\n\
         Keep it concise but personal and coach-like.",
    );
    prompt
}

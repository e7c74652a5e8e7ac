//! Static help text shown on the disclaimer, resources screen, and crisis alert.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub name: &'static str,
    pub contact: &'static str,
    pub note: &'static str,
}

pub const CRISIS_LINES: [Resource; 3] = [
    Resource {
        name: "National Suicide Prevention Lifeline",
        contact: "988",
        note: "Free, confidential support 24/7",
    },
    Resource {
        name: "Crisis Text Line",
        contact: "Text HOME to 741741",
        note: "Text-based crisis support",
    },
    Resource {
        name: "Emergency Services",
        contact: "911",
        note: "For immediate life-threatening emergencies",
    },
];

pub const SUPPORT_LINES: [Resource; 4] = [
    Resource {
        name: "SAMHSA Helpline",
        contact: "1-800-662-4357",
        note: "Treatment referral",
    },
    Resource {
        name: "NAMI Helpline",
        contact: "1-800-950-6264",
        note: "Mental health information",
    },
    Resource {
        name: "Veterans Crisis Line",
        contact: "988 then press 1",
        note: "",
    },
    Resource {
        name: "Trevor Project (LGBTQ Youth)",
        contact: "1-866-488-7386",
        note: "",
    },
];

pub const SELF_CARE_TIPS: [&str; 7] = [
    "Practice deep breathing: 4-7-8 technique (breathe in 4, hold 7, out 8)",
    "Get 7-9 hours of sleep per night",
    "Exercise for 30 minutes daily (even a walk helps!)",
    "Stay connected with friends and family",
    "Limit social media and news consumption",
    "Practice gratitude journaling",
    "Seek professional therapy - it's a sign of strength!",
];

pub const PROFESSIONAL_HELP: [Resource; 4] = [
    Resource {
        name: "Psychology Today",
        contact: "",
        note: "Find therapists in your area",
    },
    Resource {
        name: "BetterHelp/Talkspace",
        contact: "",
        note: "Online therapy platforms",
    },
    Resource {
        name: "Open Path Collective",
        contact: "",
        note: "Affordable therapy ($30-$80/session)",
    },
    Resource {
        name: "Your Insurance Provider",
        contact: "",
        note: "Check coverage for mental health services",
    },
];

/// What the app explicitly does not do, listed on the disclaimer.
pub const DISCLAIMER_LIMITS: [&str; 4] = [
    "Diagnose mental health conditions",
    "Provide medical treatment or therapy",
    "Replace professional mental healthcare",
    "Offer emergency crisis intervention",
];

pub const NOT_MEDICAL_ADVICE: &str = "⚠️ This is not medical advice. Always consult healthcare professionals for diagnosis and treatment.";
pub const FOOTER: &str = "If you're in crisis, please call 988 or contact emergency services";
pub const CRISIS_ALERT_INTRO: &str =
    "I'm concerned about what you've shared. Please know that help is available right now:";
pub const CRISIS_ALERT_ACK: &str = "I'll Reach Out for Help";

fn push_section(out: &mut String, title: &str, items: &[Resource]) {
    out.push_str(title);
    out.push('\n');
    for item in items {
        let line = match (item.contact.is_empty(), item.note.is_empty()) {
            (false, false) => format!("  {}: {} ({})", item.name, item.contact, item.note),
            (false, true) => format!("  {}: {}", item.name, item.contact),
            (true, _) => format!("  {}: {}", item.name, item.note),
        };
        out.push_str(&line);
        out.push('\n');
    }
}

/// Plain-text rendition of the resources screen.
pub fn resources_text() -> String {
    let mut out = String::new();
    push_section(&mut out, "🆘 Crisis Support (24/7)", &CRISIS_LINES);
    out.push('\n');
    push_section(&mut out, "💙 Mental Health Support", &SUPPORT_LINES);
    out.push('\n');
    out.push_str("🌱 Self-Care Tips\n");
    for tip in SELF_CARE_TIPS {
        out.push_str(&format!("  - {tip}\n"));
    }
    out.push('\n');
    push_section(&mut out, "🔍 Find Professional Help", &PROFESSIONAL_HELP);
    out
}

/// Plain-text rendition of the disclaimer shown before the first chat.
pub fn disclaimer_text() -> String {
    let mut out = String::from("⚠️ Important Disclaimer\n");
    out.push_str(
        "This AI companion is designed to provide emotional support and wellness tips, but it does NOT:\n",
    );
    for item in DISCLAIMER_LIMITS {
        out.push_str(&format!("  - {item}\n"));
    }
    out.push_str("\nIf you're in crisis, please contact:\n");
    for line in CRISIS_LINES {
        out.push_str(&format!("  {}: {}\n", line.name, line.contact));
    }
    out
}

/// Plain-text rendition of the crisis alert.
pub fn crisis_alert_text() -> String {
    let mut out = String::from("🆘 Immediate Help Available\n");
    out.push_str(CRISIS_ALERT_INTRO);
    out.push('\n');
    for line in CRISIS_LINES {
        out.push_str(&format!("  {}: {}\n", line.name, line.contact));
    }
    out
}

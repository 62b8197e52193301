use crate::error::{CatalogError, Result};
use risk_engine::Framework;
use serde::Serialize;

/// A category of review questions within one framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryTemplate {
    pub category: &'static str,
    pub questions: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameworkInfo {
    pub id: Framework,
    pub name: &'static str,
    pub description: &'static str,
}

const NIST_AI_RMF: &[CategoryTemplate] = &[
    CategoryTemplate {
        category: "Govern",
        questions: &[
            "Has AI governance structure been defined?",
            "Are roles and responsibilities documented?",
            "Is there executive oversight for AI initiatives?",
            "Have AI risk policies been established?",
            "Is there a process for AI risk identification?",
        ],
    },
    CategoryTemplate {
        category: "Map",
        questions: &[
            "Has the AI system context been documented?",
            "Are potential impacts identified?",
            "Have stakeholders been identified?",
            "Is the intended use clearly defined?",
            "Are limitations and boundaries documented?",
        ],
    },
    CategoryTemplate {
        category: "Measure",
        questions: &[
            "Are AI system metrics defined?",
            "Is performance monitoring in place?",
            "Are bias and fairness evaluated?",
            "Is model accuracy tracked?",
            "Are impact assessments conducted regularly?",
        ],
    },
    CategoryTemplate {
        category: "Manage",
        questions: &[
            "Are risk mitigation strategies documented?",
            "Is incident response plan in place?",
            "Are regular audits scheduled?",
            "Is continuous monitoring implemented?",
            "Are remediation procedures established?",
        ],
    },
];

const SOC2: &[CategoryTemplate] = &[
    CategoryTemplate {
        category: "Security",
        questions: &[
            "Is data encrypted at rest and in transit?",
            "Are access controls implemented?",
            "Is multi-factor authentication enabled?",
            "Are security logs maintained?",
            "Is vulnerability scanning performed regularly?",
        ],
    },
    CategoryTemplate {
        category: "Availability",
        questions: &[
            "Is system uptime monitored?",
            "Is disaster recovery plan documented?",
            "Are backups performed regularly?",
            "Is redundancy implemented?",
            "Are SLAs defined and monitored?",
        ],
    },
    CategoryTemplate {
        category: "Confidentiality",
        questions: &[
            "Are confidentiality agreements in place?",
            "Is data classification implemented?",
            "Are confidential data access logs maintained?",
            "Is data sharing documented?",
            "Are encryption keys managed properly?",
        ],
    },
    CategoryTemplate {
        category: "Processing Integrity",
        questions: &[
            "Is data processing accurate and complete?",
            "Are processing errors logged and monitored?",
            "Is data validation implemented?",
            "Are processing controls documented?",
            "Is system performance monitored?",
        ],
    },
    CategoryTemplate {
        category: "Privacy",
        questions: &[
            "Is personal information collected with consent?",
            "Are privacy notices provided?",
            "Is data retention policy defined?",
            "Are data deletion requests handled?",
            "Is privacy training provided to staff?",
        ],
    },
];

const OWASP_LLM: &[CategoryTemplate] = &[
    CategoryTemplate {
        category: "Input Validation",
        questions: &[
            "Is prompt injection protection implemented?",
            "Are user inputs validated?",
            "Is input sanitization in place?",
            "Are rate limits configured?",
            "Is content filtering applied?",
        ],
    },
    CategoryTemplate {
        category: "Data Security",
        questions: &[
            "Is training data vetted and secured?",
            "Are data leakage risks assessed?",
            "Is sensitive data filtered from outputs?",
            "Are data retention policies defined?",
            "Is PII redaction implemented?",
        ],
    },
    CategoryTemplate {
        category: "Model Security",
        questions: &[
            "Is the model supply chain secured?",
            "Are model versions tracked?",
            "Is model access controlled?",
            "Are model vulnerabilities monitored?",
            "Is model behavior audited?",
        ],
    },
    CategoryTemplate {
        category: "Output Handling",
        questions: &[
            "Are outputs validated before use?",
            "Is output sanitization implemented?",
            "Are harmful outputs filtered?",
            "Is output logging in place?",
            "Are output quality checks automated?",
        ],
    },
];

const SOX: &[CategoryTemplate] = &[
    CategoryTemplate {
        category: "Internal Controls",
        questions: &[
            "Are financial reporting controls documented?",
            "Is segregation of duties enforced?",
            "Are control deficiencies tracked?",
            "Is management review process in place?",
            "Are control activities monitored?",
        ],
    },
    CategoryTemplate {
        category: "Audit Trail",
        questions: &[
            "Are all changes to financial data logged?",
            "Is audit trail tamper-proof?",
            "Are logs retained for required period?",
            "Is log access restricted?",
            "Are logs regularly reviewed?",
        ],
    },
    CategoryTemplate {
        category: "Access Control",
        questions: &[
            "Is access to financial systems restricted?",
            "Are access privileges regularly reviewed?",
            "Is privileged access monitored?",
            "Are terminated users removed promptly?",
            "Is least privilege principle applied?",
        ],
    },
];

const MAESTRO: &[CategoryTemplate] = &[
    CategoryTemplate {
        category: "Model Evaluation",
        questions: &[
            "Are model performance metrics defined?",
            "Is model testing comprehensive?",
            "Are edge cases identified and tested?",
            "Is model bias evaluated?",
            "Are failure modes documented?",
        ],
    },
    CategoryTemplate {
        category: "Monitoring",
        questions: &[
            "Is real-time monitoring implemented?",
            "Are anomalies detected automatically?",
            "Is model drift monitored?",
            "Are performance degradation alerts set?",
            "Is user feedback collected?",
        ],
    },
    CategoryTemplate {
        category: "Explainability",
        questions: &[
            "Are model decisions explainable?",
            "Is reasoning transparency provided?",
            "Are stakeholders able to understand outputs?",
            "Is documentation maintained?",
            "Are explanation methods validated?",
        ],
    },
];

const FRAMEWORKS: [FrameworkInfo; 5] = [
    FrameworkInfo {
        id: Framework::Nist,
        name: "NIST AI Risk Management Framework",
        description: "Comprehensive AI risk management framework",
    },
    FrameworkInfo {
        id: Framework::Soc2,
        name: "SOC 2",
        description: "Trust Service Criteria for service organizations",
    },
    FrameworkInfo {
        id: Framework::Owasp,
        name: "OWASP Top 10 for LLMs",
        description: "Security risks specific to Large Language Models",
    },
    FrameworkInfo {
        id: Framework::Sox,
        name: "Sarbanes-Oxley",
        description: "Financial compliance and internal controls",
    },
    FrameworkInfo {
        id: Framework::Maestro,
        name: "MAESTRO",
        description: "ML model monitoring and explainability framework",
    },
];

/// Question categories for a framework
pub fn checklist_for(framework: Framework) -> &'static [CategoryTemplate] {
    match framework {
        Framework::Nist => NIST_AI_RMF,
        Framework::Soc2 => SOC2,
        Framework::Sox => SOX,
        Framework::Owasp => OWASP_LLM,
        Framework::Maestro => MAESTRO,
    }
}

/// Catalog entries, in display order
pub fn all_frameworks() -> &'static [FrameworkInfo] {
    &FRAMEWORKS
}

/// Resolve a framework id such as "NIST" or "soc2"
pub fn framework_from_id(id: &str) -> Result<Framework> {
    Framework::from_id(id).ok_or_else(|| CatalogError::UnknownFramework(id.to_string()))
}

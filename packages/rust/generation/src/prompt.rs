//! The fixed SRS instruction template.

use sha2::{Digest, Sha256};

use srsgen_shared::{NormalizedText, Prompt};

/// Instructions sent ahead of the user's requirements. The input is appended
/// verbatim after the last line.
pub const PROMPT_TEMPLATE: &str = "\
You are a senior software analyst. Generate a fully detailed, ISO 13485:2016-compliant \
Software Requirements Specification (SRS) for medical device software, based on the \
structured input below.

**INCLUDE THESE SECTIONS (deep & audit-ready):**

1. **Title & Table of Contents**
2. **Introduction**
   - Purpose, scope, definitions, references (ISO clauses 4-7)
3. **Functional Requirements**
   - For each input USR/FUN combination:
     - 4.x Function heading (FUN_xxx)
     - 4.x.1, 4.x.2 Sub-functions (UN_xxx)
     - Detailed requirements (USR_xxx...) and at least 2 test cases (TC_xxx)
   - Include traceability per function
4. **Design and Development Controls** (ISO 7.3)
5. **User Roles & Permissions**
6. **System Interfaces** (external systems, APIs)
7. **Non-Functional Requirements**
   - Performance, security, risk management (aligned with ISO 14971), validation, reliability, maintainability
8. **Software Validation & Verification** (risk-based approach)
9. **Technology Stack**
10. **Assumptions & Dependencies**
11. **Traceability Matrix**
    - USR -> FUN -> UN -> TC -> Design -> Verification Method
12. **Acronyms & Abbreviations**
13. **Document Control & Revision History**

**ADDITIONAL REQUIREMENTS:**
- Use medical device terminology
- Follow ISO formatting and clause numbering
- Ensure every requirement is traceable
- Minimum 30 pages of output

**STRUCTURED INPUT BELOW:**
";

/// Embed the normalized input at the end of the template.
pub fn build_prompt(input: &NormalizedText) -> Prompt {
    let mut text = String::with_capacity(PROMPT_TEMPLATE.len() + input.as_str().len() + 1);
    text.push_str(PROMPT_TEMPLATE);
    text.push_str(input.as_str());
    text.push('\n');
    Prompt(text)
}

/// SHA-256 of the prompt, hex-encoded. Logged so runs can be correlated
/// without logging the prompt itself.
pub fn prompt_digest(prompt: &Prompt) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_str().as_bytes());
    format!("{:x}", hasher.finalize())
}

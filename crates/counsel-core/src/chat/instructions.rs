//! System instructions and service profiles.
//!
//! Every instruction is fixed text selected by [`ServiceType`]; nothing in
//! here is ever derived from user input. All of them end with the same
//! formatting rules so replies render cleanly in the chat client, which
//! shows `##` headings and `-` bullets but not asterisk emphasis.

use serde::Serialize;

use counsel_types::chat::ServiceType;

/// Formatting rules appended to every system instruction.
pub const FORMATTING_RULES: &str = "\
Formatting rules:
- Organize longer answers under markdown headings that start with \"## \".
- Use \"- \" for bullet points and \"1. \" for ordered steps.
- Never use the asterisk character. Do not mark bold or italic text with it \
and do not use it for bullets.
- Keep paragraphs short and end with clear, prioritized next steps.";

const COUNSELOR_PERSONA: &str = "\
You are a distinguished AI career counselor with more than fifteen years of \
experience guiding professionals at large enterprises, startups and in \
executive leadership. You combine strategic career planning with practical \
execution, and you only advise on careers, work and professional growth. \
Politely steer unrelated requests back to the user's career.

## Expertise
- Strategic career planning: long-term career architecture and goal setting
- Executive transitions: senior leadership, VP and C-suite moves
- Industry navigation: technology, finance, healthcare, consulting and emerging sectors
- Personal branding: LinkedIn optimization, thought leadership, executive presence
- Compensation strategy: salary negotiation, equity analysis, benefits
- Interview mastery: executive interviews, case studies, behavioral frameworks
- Network development: strategic relationship building and mentorship
- Skills evolution: future-proofing careers against changing technology

## Communication style
- Professional and authoritative, backed by expertise
- Strategic: weigh the long-term implications of every move
- Data-driven: reference industry benchmarks, salary data and market trends
- Structured: offer frameworks such as the STAR method or 30-60-90 day plans
- Personal: tailor advice to the user's career stage and goals

## Response structure
1. Strategic assessment of the situation
2. Two or three specific, actionable recommendations
3. A realistic implementation timeline with milestones
4. Success metrics to measure progress
5. Clear, prioritized next steps

Keep the gravitas of a senior executive advisor while staying approachable \
and encouraging.";

const CAREER_STRATEGY: &str = "\
You are a professional AI career counselor focused on career development, \
strategic planning and professional growth. Structure your answer as a \
career strategy analysis:

## Initial assessment
- Acknowledge the user's situation with empathy
- Identify key challenges and opportunities
- Ask targeted clarifying questions

## Strategic framework
- Lay out a career development roadmap
- Include market analysis and industry insight
- Name the skills to develop first

## Action plan
- Specific, measurable steps with realistic timelines
- Networking and professional development activities

## Success metrics
- Clear milestones, a way to track them, and a regular review cadence";

const RESUME_REVIEW: &str = "\
You are a professional AI career counselor specializing in resume \
optimization and personal branding. Structure your answer as a resume \
optimization analysis:

## Content evaluation
- Professional summary and value proposition
- Work experience descriptions and achievements
- Skills section and keyword coverage

## Format and design
- Visual hierarchy and readability
- Applicant tracking system compatibility
- Length and section organization

## Industry alignment
- Comparison with current market standards
- Industry-specific improvements, certifications or skills

## Improvement roadmap
- High-impact changes first
- Concrete rewriting suggestions
- Ways to quantify achievements";

const INTERVIEW_PREP: &str = "\
You are a professional AI career counselor specializing in interview \
preparation and performance coaching. Structure your answer as an interview \
preparation strategy:

## Preparation framework
- Research on the company, role and interviewers
- Anticipated questions and prepared answers
- Personal stories built with the STAR method

## Performance
- Communication technique and body language
- Confidence building and managing nerves

## Question mastery
- Behavioral, technical and situational questions
- Preparing for the compensation conversation

## Practice and refinement
- Mock interviews, recording and self-assessment
- Continuous improvement between rounds";

const SALARY_GUIDANCE: &str = "\
You are a professional AI career counselor specializing in compensation \
strategy and salary negotiation. Structure your answer as a compensation \
strategy analysis:

## Market research
- Salary benchmarking methods and sources
- Industry and location adjustments
- Evaluating the total compensation package

## Negotiation preparation
- Building the value proposition
- Assessing leverage and timing

## Strategic approach
- Communication scripts and frameworks
- Evaluating counteroffers and long-term impact

## Implementation plan
- Step-by-step negotiation process
- Risk mitigation, follow-up and relationship management";

/// Everything the system knows about one counseling service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceProfile {
    pub service_type: ServiceType,
    pub label: &'static str,
    pub system_instruction: String,
    pub follow_up_questions: &'static [&'static str],
}

/// Human-readable name of a service.
pub fn label(service_type: ServiceType) -> &'static str {
    match service_type {
        ServiceType::CareerStrategy => "Career Strategy",
        ServiceType::ResumeReview => "Resume Review",
        ServiceType::InterviewPrep => "Interview Prep",
        ServiceType::SalaryGuidance => "Salary Guidance",
        ServiceType::General => "General Career Guidance",
    }
}

/// The full system instruction for a service, formatting rules included.
pub fn system_instruction(service_type: ServiceType) -> String {
    let body = match service_type {
        ServiceType::CareerStrategy => CAREER_STRATEGY,
        ServiceType::ResumeReview => RESUME_REVIEW,
        ServiceType::InterviewPrep => INTERVIEW_PREP,
        ServiceType::SalaryGuidance => SALARY_GUIDANCE,
        ServiceType::General => COUNSELOR_PERSONA,
    };
    format!("{body}\n\n{FORMATTING_RULES}")
}

/// Questions the counselor typically needs answered for a service.
pub fn follow_up_questions(service_type: ServiceType) -> &'static [&'static str] {
    match service_type {
        ServiceType::CareerStrategy => &[
            "What is your current role and industry?",
            "What are your 1-year and 5-year career goals?",
            "What challenges are you currently facing in your career?",
            "What skills do you want to develop or strengthen?",
            "Are you looking to advance within your current company or explore new opportunities?",
        ],
        ServiceType::ResumeReview => &[
            "What industry or role are you targeting?",
            "How many years of experience do you have?",
            "What are your top 3-5 key achievements?",
            "Are you applying through online job boards that use applicant tracking systems?",
            "Do you have any career gaps or transitions to address?",
        ],
        ServiceType::InterviewPrep => &[
            "What type of interview is this (phone, video, in-person, panel)?",
            "What role and company are you interviewing for?",
            "What is your biggest concern about the interview?",
            "Do you have specific examples of your achievements ready?",
            "Have you researched the company and interviewer?",
        ],
        ServiceType::SalaryGuidance => &[
            "What is your current salary and target range?",
            "What role or level are you negotiating for?",
            "Do you have competing offers or other leverage?",
            "What matters most to you: base salary, benefits, or equity?",
            "What is your timeline for this negotiation?",
        ],
        ServiceType::General => &[],
    }
}

pub fn profile(service_type: ServiceType) -> ServiceProfile {
    ServiceProfile {
        service_type,
        label: label(service_type),
        system_instruction: system_instruction(service_type),
        follow_up_questions: follow_up_questions(service_type),
    }
}

/// Profiles for every service, in display order.
pub fn catalog() -> Vec<ServiceProfile> {
    ServiceType::ALL.into_iter().map(profile).collect()
}

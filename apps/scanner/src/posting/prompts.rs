//! Prompt templates for posting summarization.
//!
//! Placeholders use `{name}` and are filled with `str::replace`. The reply
//! format is pinned down in the template itself; `parser` depends on these
//! exact headings, so template and parser change together.

/// Single-pass summary of a whole posting. `{job_content}` is the extracted
/// page text. Drives the model at low temperature so the heading structure
/// comes back intact.
pub const SUMMARY_TEMPLATE: &str = r#"다음 채용 공고 내용을 핵심 정보만 정리하여 한글로 요약해 주세요:

{job_content}

아래 형식으로 정리해주세요:

## 공고명: [공고명]
### 회사명: [회사명]

**마감기한**
- [마감기한]

### A. 회사소개 (비전, 연혁) & 직무 소개 (주요 업무):
- [회사 소개 및 주요 업무 내용]

### B. 자격요건 (필수조건) & 우대사항 (선택 요건):
**필수조건:**
- [필수 자격요건들]

**우대사항:**
- [우대사항들]

### C. 혜택 및 복지 & 기타사항:
- [혜택, 복지, 기타 정보들]
"#;

/// Map stage for oversized postings: condenses one chunk. `{text}` is the
/// chunk.
pub const MAP_TEMPLATE: &str = r#"다음 채용공고 텍스트의 핵심 내용을 간단히 요약해주세요.
영어 내용이 있다면 한국어로 번역해서 요약해주세요:

{text}

핵심 요약:"#;

/// Reduce stage: merges the chunk summaries into the final structured
/// summary. `{text}` is the concatenated partials. Must produce the same
/// heading structure as `SUMMARY_TEMPLATE`.
pub const REDUCE_TEMPLATE: &str = r#"다음은 채용공고의 여러 부분을 요약한 내용들입니다.
이를 종합하여 완전한 채용공고 요약을 만들어주세요:

{text}

아래 형식으로 최종 정리해주세요:

## 공고명: [공고명]
### 회사명: [회사명]

**마감기한**
- [마감기한]

### A. 회사소개 (비전, 연혁) & 직무 소개 (주요 업무):
- [회사 소개 및 주요 업무 내용]

### B. 자격요건 (필수조건) & 우대사항 (선택 요건):
**필수조건:**
- [필수 자격요건들]

**우대사항:**
- [우대사항들]

### C. 혜택 및 복지 & 기타사항:
- [혜택, 복지, 기타 정보들]
"#;

// * Configuration Constants
// * Central location for all configurable thresholds, timeouts, and prompts

// * Page navigation timeout in milliseconds
pub const PAGE_TIMEOUT_MS: u64 = 60_000;

// * Delay after navigation before the first screenshot (lets late content render)
pub const SETTLE_DELAY_MS: u64 = 1_500;

// * Delay after each scroll step before capturing
pub const SCROLL_SETTLE_MS: u64 = 500;

// * Upper bound on screenshots per page (very tall / infinite-scroll pages)
pub const MAX_SCREENSHOTS: usize = 20;

// * Screenshot file naming: screenshot{i}.png, i is 0-based capture order
pub const SCREENSHOT_PREFIX: &str = "screenshot";
pub const SCREENSHOT_EXTENSION: &str = "png";

// * Artifact wait loop defaults
pub const EXPECTED_SCREENSHOT_COUNT: usize = 2;
pub const ARTIFACT_WAIT_SECS: u64 = 60;
pub const ARTIFACT_POLL_SECS: u64 = 2;

// * Image URL allow-list, matched case-insensitively against the URL path
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];

// * Hostname suffixes eligible for direct structured text extraction
pub const DOCUMENTATION_DOMAINS: &[&str] = &["wikipedia.org"];

// * Chunker window in characters (grapheme clusters) and overlap between windows
pub const CHUNK_WINDOW_SIZE: usize = 1000;
pub const CHUNK_OVERLAP: usize = 200;

// * Chunks stuffed into the answer-synthesis context
pub const QA_TOP_K: usize = 4;

// * Gemini REST endpoints and model ids
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_VISION_MODEL: &str = "gemini-pro-vision";
pub const GEMINI_TEXT_MODEL: &str = "gemini-pro";
pub const GEMINI_EMBED_MODEL: &str = "embedding-001";

// * batchEmbedContents caps requests per call
pub const EMBED_BATCH_LIMIT: usize = 100;

// * Sampling temperature for answer synthesis
pub const QA_TEMPERATURE: f32 = 0.3;

// * Identity presented on plain HTTP fetches (extractor, image downloads)
pub const HTTP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// * Root for every on-disk artifact unless SITELENS_WORKDIR overrides it
pub const DEFAULT_WORKDIR: &str = "./sitelens_data";

// * One fixed prompt for both screenshot and discovered-image description
pub const DESCRIBE_PROMPT: &str = "Describe this image in detail. Include any visible text, \
headings, figures, charts, and the overall layout, so the description can stand in for the \
image inside a text-only knowledge base.";

// * Answer-synthesis prompt; placeholders are filled verbatim
pub const QA_PROMPT_TEMPLATE: &str = "Answer the questions as detailed as possible from the \
provided context, make sure to provide all details, if the answer is not in the provided \
context just say \"Answer is not available in the context\". Don't provide the wrong answer\n\
context:\n{context}\n\nQuestion:\n{question}\n\nAnswer:";

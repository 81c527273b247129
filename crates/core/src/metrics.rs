//! 메트릭 상수 및 설명 등록
//!
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 바이너리는 recorder를 설치하지 않으므로, 임베딩하는 쪽이
//! recorder를 설치하지 않으면 모든 호출은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `blackduck_resource_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)

use metrics::{Unit, describe_counter, describe_histogram};

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// 요청 단계 레이블 키 (login, projects, versions)
pub const LABEL_STAGE: &str = "stage";

/// 서비스 요청 수 (counter, label: stage, result)
pub const HUB_REQUESTS_TOTAL: &str = "blackduck_resource_hub_requests_total";

/// 서비스 요청 지연 시간 (histogram, 초, label: stage)
pub const HUB_REQUEST_DURATION_SECONDS: &str = "blackduck_resource_hub_request_duration_seconds";

/// 프로젝트 캐시 적중 수 (counter)
pub const PROJECT_CACHE_HITS_TOTAL: &str = "blackduck_resource_project_cache_hits_total";

/// 프로젝트 캐시 미스 수 (counter)
pub const PROJECT_CACHE_MISSES_TOTAL: &str = "blackduck_resource_project_cache_misses_total";

/// 해석된 스캔 로그 수 (counter, label: result)
pub const SCAN_LOGS_INTERPRETED_TOTAL: &str = "blackduck_resource_scan_logs_interpreted_total";

/// 모든 메트릭 설명을 등록합니다.
///
/// recorder 설치 직후 한 번 호출합니다.
pub fn describe_metrics() {
    describe_counter!(
        HUB_REQUESTS_TOTAL,
        "Requests sent to the scanner service, by stage and result"
    );
    describe_histogram!(
        HUB_REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "Latency of scanner service requests"
    );
    describe_counter!(
        PROJECT_CACHE_HITS_TOTAL,
        "Project resolutions answered from the cache"
    );
    describe_counter!(
        PROJECT_CACHE_MISSES_TOTAL,
        "Project resolutions that went to the service"
    );
    describe_counter!(
        SCAN_LOGS_INTERPRETED_TOTAL,
        "Scan tool outputs interpreted, by result"
    );
}

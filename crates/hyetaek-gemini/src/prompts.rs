//! Prompt builders for the four gateway operations.
//!
//! Each prompt names the exact output fields, enumerates the allowed
//! category labels, and demands bare JSON with no surrounding prose. Builders
//! are deterministic: identical inputs produce identical prompts.

use std::fmt::Write as _;

use hyetaek_core::{CatalogConfig, Category, Store, NO_DISCOUNT_LABEL};

const JSON_ONLY_ARRAY: &str =
    "설명이나 추가 텍스트, 마크다운 없이 순수 JSON 배열만 반환해야 합니다.";
const JSON_ONLY_OBJECT: &str =
    "설명이나 추가 텍스트, 마크다운 없이 순수 JSON 객체만 반환해야 합니다.";

/// Prompt that asks the model to generate the initial store catalog.
#[must_use]
pub fn seed_catalog_prompt(catalog: &CatalogConfig) -> String {
    let categories = catalog.seeded_categories();
    let mut hints = String::new();
    for category in &categories {
        let _ = writeln!(hints, "- {}: {}", category.label(), category.prompt_hint());
    }
    let allowed = categories
        .iter()
        .map(|c| format!("\"{}\"", c.label()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{region} 지역의 학생 할인 제휴 상점 {min}-{max}곳에 대한 할인 정보를 생성해주세요.
아래 카테고리별 예시를 참고해 여러 카테고리에 고르게 분포시켜 주세요.

{hints}
각 상점은 다음 필드를 가진 JSON 객체여야 합니다:
- id: UUID 문자열
- name: 지점명까지 포함한 고유한 상점 이름 (예: \"교보문고 광화문점\")
- category: 다음 중 하나: {allowed}
- address: 실제적인 주소 (예: \"서울특별시 종로구 종로 1\")
- contact: 연락처 문자열 (예: \"02-123-4567\")
- latitude: 주소에 맞는 위도 (숫자)
- longitude: 주소에 맞는 경도 (숫자)
- discounts: 1-2개의 할인 정보 배열. 각 항목은 다음을 포함합니다:
  - id: UUID 문자열
  - description: 할인 설명 (예: \"학생증 제시 시 전공서적 10% 할인\")
  - conditions: 할인 조건 (예: \"일부 품목 제외\")
- imageUrl: https://picsum.photos/seed/<임의 문자열>/400/300 형식의 이미지 URL
- rating: 0에서 5 사이의 숫자 (예: 4.5)
- operatingHours: 운영 시간 (예: \"매일 10:00 - 22:00\")

위도와 경도는 {region} 안의 여러 동네에 퍼지도록 하고, 모든 상점에 숫자로 반드시 포함해주세요.
{JSON_ONLY_ARRAY}
",
        region = catalog.region,
        min = catalog.min_stores,
        max = catalog.max_stores,
    )
}

/// Prompt that asks for the ids of the stores best matching `preferences`.
#[must_use]
pub fn recommendation_prompt(preferences: &str, stores: &[Store], count: u32) -> String {
    let mut listing = String::new();
    for store in stores {
        let discounts = store
            .discounts
            .iter()
            .map(|d| d.description.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            listing,
            "- [{}] {} ({}, 주소: {}): {}",
            store.id, store.name, store.category, store.address, discounts
        );
    }

    format!(
        "다음은 사용자의 선호도입니다:
\"{preferences}\"

아래는 현재 이용 가능한 할인 상점 목록입니다. 대괄호 안의 값이 상점 id입니다:
{listing}
사용자의 선호도와 할인 정보를 바탕으로 가장 적합한 상점 {count}곳을 추천해주세요.
추천하는 상점의 id 값만 적합한 순서대로 JSON 문자열 배열로 반환해주세요. 예: [\"id1\", \"id2\", \"id3\"]
{JSON_ONLY_ARRAY}
",
        preferences = preferences.trim(),
    )
}

/// Prompt that extracts receipt fields from free text typed by the user.
#[must_use]
pub fn receipt_text_prompt(receipt_text: &str) -> String {
    format!(
        "다음은 사용자가 입력한 영수증 텍스트입니다:
\"{text}\"

이 텍스트를 분석하여 다음 필드를 가진 JSON 객체를 만들어주세요:
- storeName: 상점 이름 (가장 가능성 높은 이름)
- items: 구매한 주요 품목 또는 서비스 목록 (문자열 배열)
- discountApplied: '할인', '프로모션', '쿠폰' 등 할인 관련 내용을 찾아 적용된 할인을 정확히 기재. 없으면 \"{none}\"
- totalAmount: 총 결제 금액 문자열 (예: \"18000원\")
- date: 영수증 날짜 (YYYY-MM-DD). 알 수 없으면 빈 문자열
- storeCategory: 다음 중 하나: {allowed}

정보가 불완전하면 최대한 추론해서 채워주세요.
{JSON_ONLY_OBJECT}
",
        text = receipt_text.trim(),
        none = NO_DISCOUNT_LABEL,
        allowed = Category::joined_labels(" | "),
    )
}

/// Text part sent alongside a receipt image.
#[must_use]
pub fn receipt_image_prompt() -> String {
    format!(
        "당신은 학생과 일반 사용자를 위한 할인 정보 앱의 어시스턴트입니다.
첨부된 영수증 이미지를 분석하고, 사용자가 받을 수 있는 혜택을 두 그룹으로 나누어 제안해주세요.

1. 영수증 분석 (analyzedReceipt):
   - storeName: 상점 이름
   - items: 구매한 주요 품목 목록 (문자열 배열)
   - discountApplied: 영수증에 표시된 할인, 프로모션, 쿠폰 적용 내역. 없으면 \"{none}\"
   - totalAmount: 최종 결제 금액 문자열
   - date: 구매 날짜 (YYYY-MM-DD). 보이지 않으면 빈 문자열
   - storeCategory: 다음 중 하나: {allowed}

2. 혜택 제안:
   - immediateBenefits: 지금 이 영수증으로 바로 받을 수 있는 혜택 (예: 영수증 하단 설문조사 쿠폰)
   - futureBenefits: 다음 방문 때 유용한 혜택 (예: 특정 시간대 할인, 앱 전용 쿠폰, 멤버십)
   각 혜택은 {{\"title\": 문자열, \"description\": 문자열}} 형태입니다.

출력 예시:
{{
  \"analyzedReceipt\": {{
    \"storeName\": \"KFC 코엑스몰점\",
    \"items\": [\"징거버거 세트\"],
    \"discountApplied\": \"{none}\",
    \"totalAmount\": \"7,800원\",
    \"date\": \"2024-07-27\",
    \"storeCategory\": \"음식\"
  }},
  \"immediateBenefits\": [
    {{\"title\": \"영수증 설문조사 쿠폰\", \"description\": \"영수증 하단 설문에 참여하면 다음 구매 시 세트 업그레이드 코드를 받을 수 있습니다.\"}}
  ],
  \"futureBenefits\": [
    {{\"title\": \"치킨나이트\", \"description\": \"오후 9시 이후 치킨 단품 1+1 혜택이 있습니다.\"}}
  ]
}}

{JSON_ONLY_OBJECT}
",
        none = NO_DISCOUNT_LABEL,
        allowed = Category::joined_labels(", "),
    )
}

use actix_web::{
    App, HttpResponse,
    http::{StatusCode, header},
    test, web,
};

use pushkind_common::middleware::RedirectUnauthorized;

#[actix_web::test]
async fn unauthorized_finance_page_redirects_to_signin() {
    let app = test::init_service(
        App::new().service(
            web::scope("")
                .wrap(RedirectUnauthorized)
                .route(
                    "/dunning",
                    web::get().to(|| async { HttpResponse::Unauthorized().finish() }),
                ),
        ),
    )
    .await;

    let req = test::TestRequest::get().uri("/dunning").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/signin"
    );
}

#[actix_web::test]
async fn rendered_page_passes_through() {
    let app = test::init_service(
        App::new().service(
            web::scope("")
                .wrap(RedirectUnauthorized)
                .route(
                    "/",
                    web::get().to(|| async { HttpResponse::Ok().body("overview") }),
                ),
        ),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

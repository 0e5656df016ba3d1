mod crawl_session_test;
mod payload_parser_test;

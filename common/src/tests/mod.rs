mod client_token;

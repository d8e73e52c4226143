mod test_likes;
